//! Orchestrator module for the fake data pipeline.
//!
//! Wires inbound triggers to the generators: the shell-ready announcement,
//! the mocked HTTP routes and the mocked hub subscription. Every
//! triggered generation runs as its own task; failures are reported back
//! here and logged.

use std::future::Future;
use std::sync::Arc;

use glimpse_fake_shared::RequestId;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{error, info, instrument, warn};

use crate::bus::{Event, EventBus, EventFilter, Subscription};
use crate::errors::FakeError;
use crate::generator::{DetailGenerator, SummaryGenerator};
use crate::mock::{HubTopic, MockRequest, MockResponse, MockRoute};
use crate::relay::UserRepositoryRelay;
use crate::session::Session;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Size of the trigger channel buffer.
    pub trigger_buffer_size: usize,
    /// Whether to relay local request summaries to the user repository.
    pub relay_user_details: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            trigger_buffer_size: 100,
            relay_user_details: true,
        }
    }
}

/// A request from a client of the mocked surfaces.
#[derive(Debug)]
pub enum Trigger {
    /// The shell is ready for request data.
    ShellReady,
    /// An HTTP call; the mock response is sent back on `respond_to`.
    Http {
        request: MockRequest,
        respond_to: oneshot::Sender<MockResponse>,
    },
    /// A subscription on the real-time hub.
    HubSubscribe { topic: String },
}

/// A generator task that failed.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: &'static str,
    pub error: FakeError,
}

/// Counters reported when the orchestrator stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorStats {
    pub tasks_spawned: u64,
    pub failures: u64,
    pub ignored_triggers: u64,
}

/// Client-side handle to a running fake service.
#[derive(Clone)]
pub struct FakeServiceHandle {
    triggers: mpsc::Sender<Trigger>,
    bus: Arc<EventBus>,
    shutdown_tx: broadcast::Sender<()>,
}

impl FakeServiceHandle {
    /// Announce that the shell is ready for request data.
    ///
    /// Queued on the trigger channel, so the announcement is never lost to a
    /// lagging bus subscriber. The orchestrator republishes it on the bus.
    pub async fn shell_ready(&self) -> Result<(), FakeError> {
        self.triggers
            .send(Trigger::ShellReady)
            .await
            .map_err(|_| FakeError::channel("orchestrator is not running"))
    }

    /// Issue a mocked `GET` request.
    pub async fn get(&self, path: &str) -> Result<MockResponse, FakeError> {
        self.request(MockRequest::get(path)).await
    }

    /// Issue a mocked HTTP request.
    pub async fn request(&self, request: MockRequest) -> Result<MockResponse, FakeError> {
        let (respond_to, response) = oneshot::channel();
        self.triggers
            .send(Trigger::Http { request, respond_to })
            .await
            .map_err(|_| FakeError::channel("orchestrator is not running"))?;

        response
            .await
            .map_err(|_| FakeError::channel("orchestrator dropped the response"))
    }

    /// Subscribe to a topic on the mocked hub.
    pub async fn subscribe_hub(&self, topic: &str) -> Result<(), FakeError> {
        self.triggers
            .send(Trigger::HubSubscribe {
                topic: topic.to_string(),
            })
            .await
            .map_err(|_| FakeError::channel("orchestrator is not running"))
    }

    /// Subscribe to events on the bus.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Ask the orchestrator to stop.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Outcome of one wait in the orchestrator loop.
enum Step {
    Failure(TaskFailure),
    Shutdown,
    Trigger(Option<Trigger>),
}

/// Composition root of the fake service.
pub struct Orchestrator {
    summaries: SummaryGenerator,
    details: DetailGenerator,
    relay: Option<UserRepositoryRelay>,
    bus: Arc<EventBus>,
    /// Keeps the trigger channel open until `run` starts.
    triggers_tx: Option<mpsc::Sender<Trigger>>,
    triggers_weak: mpsc::WeakSender<Trigger>,
    triggers_rx: mpsc::Receiver<Trigger>,
    failures_tx: mpsc::UnboundedSender<TaskFailure>,
    failures_rx: mpsc::UnboundedReceiver<TaskFailure>,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_rx: broadcast::Receiver<()>,
    stats: OrchestratorStats,
}

impl Orchestrator {
    /// Create a new orchestrator for the given session.
    pub fn new(session: Arc<Session>) -> Self {
        Self::with_config(session, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    ///
    /// The relay subscribes here, so summaries published before `run` is
    /// polled are still relayed.
    pub fn with_config(session: Arc<Session>, config: OrchestratorConfig) -> Self {
        let bus = session.bus().clone();
        let (triggers_tx, triggers_rx) = mpsc::channel(config.trigger_buffer_size);
        let (failures_tx, failures_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let triggers_weak = triggers_tx.downgrade();

        Self {
            summaries: SummaryGenerator::new(session.clone()),
            details: DetailGenerator::new(session),
            relay: config
                .relay_user_details
                .then(|| UserRepositoryRelay::new(bus.clone())),
            bus,
            triggers_tx: Some(triggers_tx),
            triggers_weak,
            triggers_rx,
            failures_tx,
            failures_rx,
            shutdown_tx,
            shutdown_rx,
            stats: OrchestratorStats::default(),
        }
    }

    /// Get a handle for driving the mocked surfaces.
    ///
    /// Once `run` has started and every handle is dropped, new handles are
    /// closed.
    pub fn handle(&self) -> FakeServiceHandle {
        let triggers = self
            .triggers_weak
            .upgrade()
            .unwrap_or_else(|| mpsc::channel(1).0);

        FakeServiceHandle {
            triggers,
            bus: self.bus.clone(),
            shutdown_tx: self.shutdown_tx.clone(),
        }
    }

    /// Run the orchestrator until shutdown is requested or every handle is
    /// dropped.
    ///
    /// Generator tasks already in flight keep running on the runtime after
    /// this returns.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<OrchestratorStats, FakeError> {
        info!("Starting fake service orchestrator");

        let relay = self.relay.take().map(UserRepositoryRelay::spawn);
        self.triggers_tx = None;

        loop {
            let step = tokio::select! {
                biased;
                Some(failure) = self.failures_rx.recv() => Step::Failure(failure),
                _ = self.shutdown_rx.recv() => Step::Shutdown,
                trigger = self.triggers_rx.recv() => Step::Trigger(trigger),
            };

            match step {
                Step::Failure(failure) => self.record_failure(failure),
                Step::Shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
                Step::Trigger(Some(trigger)) => self.handle_trigger(trigger),
                Step::Trigger(None) => {
                    info!("Trigger channel closed");
                    break;
                }
            }
        }

        if let Some(relay) = relay {
            relay.abort();
        }

        info!(
            tasks_spawned = self.stats.tasks_spawned,
            failures = self.stats.failures,
            ignored_triggers = self.stats.ignored_triggers,
            "Orchestrator shutdown complete"
        );
        Ok(self.stats)
    }

    fn handle_trigger(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::ShellReady => {
                self.bus.publish(Event::ShellRequestReady);
                self.spawn_local();
            }
            Trigger::Http { request, respond_to } => {
                let response = match MockRoute::resolve(&request) {
                    Some(MockRoute::History) => {
                        self.spawn_remote();
                        MockResponse::ok()
                    }
                    Some(MockRoute::MessageById(id)) => {
                        self.spawn_detail(id);
                        MockResponse::ok()
                    }
                    None => {
                        warn!(method = %request.method, path = %request.path, "No mock route");
                        self.stats.ignored_triggers += 1;
                        MockResponse::not_found()
                    }
                };
                // The caller may have stopped waiting.
                let _ = respond_to.send(response);
            }
            Trigger::HubSubscribe { topic } => match HubTopic::parse(&topic) {
                Some(HubTopic::SummaryMessage) => self.spawn_stream(),
                None => {
                    warn!(topic = %topic, "No mock hub topic");
                    self.stats.ignored_triggers += 1;
                }
            },
        }
    }

    fn spawn_local(&mut self) {
        let summaries = self.summaries.clone();
        self.spawn_task("summary.local", async move { summaries.local().await.map(drop) });
    }

    fn spawn_remote(&mut self) {
        let summaries = self.summaries.clone();
        self.spawn_task("summary.remote", async move { summaries.remote().await.map(drop) });
    }

    fn spawn_stream(&mut self) {
        let summaries = self.summaries.clone();
        self.spawn_task("summary.stream", async move { summaries.stream().await.map(drop) });
    }

    fn spawn_detail(&mut self, id: RequestId) {
        let details = self.details.clone();
        self.spawn_task("detail.remote", async move { details.remote(id).await.map(drop) });
    }

    fn spawn_task<F>(&mut self, task: &'static str, future: F)
    where
        F: Future<Output = Result<(), FakeError>> + Send + 'static,
    {
        self.stats.tasks_spawned += 1;
        let failures = self.failures_tx.clone();

        tokio::spawn(async move {
            if let Err(error) = future.await {
                // Only fails once the orchestrator is gone.
                let _ = failures.send(TaskFailure { task, error });
            }
        });
    }

    fn record_failure(&mut self, failure: TaskFailure) {
        self.stats.failures += 1;
        error!(task = failure.task, error = %failure.error, "Generator task failed");
    }
}
