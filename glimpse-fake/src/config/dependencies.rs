//! Dependency initialization and wiring for the fake service.

use std::sync::Arc;
use tracing::info;

use crate::config::ServiceConfig;
use glimpse_fake_pipeline::{
    bus::EventBus,
    orchestrator::{FakeServiceHandle, Orchestrator, OrchestratorConfig},
    session::Session,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The session shared by every generator.
    pub session: Arc<Session>,
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Client handle for the orchestrator's mocked surfaces.
    pub handle: FakeServiceHandle,
}

impl Dependencies {
    /// Wire the bus, session and orchestrator from the given configuration.
    pub fn new(config: &ServiceConfig) -> Self {
        info!(
            seed = ?config.seed,
            bus_capacity = config.bus_capacity,
            trigger_buffer_size = config.trigger_buffer_size,
            "Initializing dependencies"
        );

        let bus = Arc::new(EventBus::with_capacity(config.bus_capacity));

        let session = Arc::new(Session::builder(bus).with_seed(config.seed).build());

        let orchestrator = Orchestrator::with_config(
            session.clone(),
            OrchestratorConfig {
                trigger_buffer_size: config.trigger_buffer_size,
                ..OrchestratorConfig::default()
            },
        );
        let handle = orchestrator.handle();

        Self {
            session,
            orchestrator,
            handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependencies_share_one_bus() {
        let config = ServiceConfig {
            seed: Some(11),
            bus_capacity: 16,
            ..ServiceConfig::default()
        };
        let deps = Dependencies::new(&config);

        assert_eq!(deps.session.bus().capacity(), 16);
        assert!((25..=35).contains(&deps.session.budget().total()));
    }
}
