//! # Glimpse Fake
//!
//! Main library for the Glimpse fake data service.
//!
//! This crate provides the configuration, dependency wiring and demo driver
//! for running the fake data pipeline without a real Glimpse server.

pub mod config;
pub mod demo;

pub use config::{Dependencies, LogFormat, ServiceConfig};

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] glimpse_fake_pipeline::FakeError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
