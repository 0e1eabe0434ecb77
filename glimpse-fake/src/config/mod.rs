//! Service configuration.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::str::FromStr;

use glimpse_fake_pipeline::bus::DEFAULT_BUS_CAPACITY;
use glimpse_fake_pipeline::orchestrator::OrchestratorConfig;

use crate::ServiceError;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ServiceError::config(format!("Unknown LOG_FORMAT: {}", other))),
        }
    }
}

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub seed: Option<u64>,
    pub bus_capacity: usize,
    pub trigger_buffer_size: usize,
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            seed: None,
            bus_capacity: DEFAULT_BUS_CAPACITY,
            trigger_buffer_size: OrchestratorConfig::default().trigger_buffer_size,
            log_format: LogFormat::Text,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FAKE_SEED`: seed for reproducible runs (default: random)
    /// - `FAKE_BUS_CAPACITY`: event bus buffer (default: 1000)
    /// - `FAKE_TRIGGER_BUFFER`: trigger channel buffer (default: 100)
    /// - `LOG_FORMAT`: `text` or `json` (default: text)
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServiceError> {
        let defaults = Self::default();

        let config = Self {
            seed: parse_var(&lookup, "FAKE_SEED")?,
            bus_capacity: parse_var(&lookup, "FAKE_BUS_CAPACITY")?.unwrap_or(defaults.bus_capacity),
            trigger_buffer_size: parse_var(&lookup, "FAKE_TRIGGER_BUFFER")?
                .unwrap_or(defaults.trigger_buffer_size),
            log_format: match lookup("LOG_FORMAT") {
                Some(value) => value.parse()?,
                None => defaults.log_format,
            },
        };

        if config.bus_capacity == 0 {
            return Err(ServiceError::config("FAKE_BUS_CAPACITY must be positive"));
        }
        if config.trigger_buffer_size == 0 {
            return Err(ServiceError::config("FAKE_TRIGGER_BUFFER must be positive"));
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ServiceError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ServiceError::config(format!("Invalid {}: {}", key, value)))
        })
        .transpose()
}
