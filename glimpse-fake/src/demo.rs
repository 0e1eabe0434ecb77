//! Demo driver.
//!
//! Plays the part of the client application: announces the shell, asks for
//! the message history, subscribes to the live stream and opens the first
//! request it sees. Every event received is logged.

use std::collections::HashMap;
use std::time::Duration;

use futures::StreamExt;
use glimpse_fake_pipeline::bus::{Event, EventFilter, Topic};
use glimpse_fake_pipeline::mock::HubTopic;
use glimpse_fake_pipeline::orchestrator::FakeServiceHandle;
use tracing::{debug, info, warn};

use crate::ServiceError;

/// Path of the mocked history endpoint.
pub const HISTORY_PATH: &str = "/glimpse/data/history";

/// Stop once no event arrived for this long.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Events received by the demo, per topic.
#[derive(Debug, Default)]
pub struct DemoReport {
    pub events: HashMap<Topic, usize>,
    pub records: usize,
    pub opened_request: Option<String>,
}

impl DemoReport {
    pub fn count(&self, topic: Topic) -> usize {
        self.events.get(&topic).copied().unwrap_or(0)
    }
}

/// Drive the fake service until it goes idle.
pub async fn run(handle: &FakeServiceHandle, idle_timeout: Duration) -> Result<DemoReport, ServiceError> {
    let mut events = handle.subscribe(EventFilter::all()).into_stream();
    let mut report = DemoReport::default();

    handle.shell_ready().await?;
    let response = handle.get(HISTORY_PATH).await?;
    debug!(status = response.status, "History requested");
    handle.subscribe_hub(HubTopic::SummaryMessage.as_str()).await?;

    loop {
        let event = match tokio::time::timeout(idle_timeout, events.next()).await {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(_) => {
                info!(idle_secs = idle_timeout.as_secs(), "No events, demo finished");
                break;
            }
        };

        let topic = event.topic();
        *report.events.entry(topic).or_default() += 1;
        info!(topic = %topic, items = event.item_count(), "Event received");

        match event {
            Event::RequestSummaryFoundLocal(view) => {
                report.records += view.new_requests.len();

                if report.opened_request.is_none() {
                    if let Some(request) = view.new_requests.first() {
                        debug!(
                            request = %serde_json::to_string(request).unwrap_or_default(),
                            "Opening request"
                        );
                        let path = format!("/glimpse/data/messages/{}", request.id);
                        let response = handle.get(&path).await?;
                        if !response.is_success() {
                            warn!(status = response.status, path = %path, "Detail request rejected");
                        }
                        report.opened_request = Some(request.id.to_string());
                    }
                }
            }
            Event::MessageSummaryFoundRemote(messages) | Event::MessageSummaryFoundStream(messages) => {
                report.records += messages
                    .iter()
                    .filter(|m| m.types.iter().any(|t| t == "begin-request"))
                    .count();
            }
            _ => {}
        }
    }

    info!(
        records = report.records,
        opened_request = ?report.opened_request,
        "Demo report"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Dependencies, ServiceConfig};

    #[tokio::test(start_paused = true)]
    async fn test_demo_receives_every_channel() {
        let config = ServiceConfig {
            seed: Some(5),
            ..ServiceConfig::default()
        };
        let Dependencies {
            session,
            mut orchestrator,
            handle,
        } = Dependencies::new(&config);
        let running = tokio::spawn(async move { orchestrator.run().await });

        let report = run(&handle, DEFAULT_IDLE_TIMEOUT).await.unwrap();

        assert_eq!(report.count(Topic::ShellRequestReady), 1);
        assert_eq!(report.count(Topic::RequestSummaryFoundLocal), 1);
        assert_eq!(report.count(Topic::UserDetailFoundInternal), 1);
        assert_eq!(report.count(Topic::MessageSummaryFoundRemote), 1);
        assert_eq!(report.count(Topic::MessageDetailFoundRemote), 1);
        assert!(report.count(Topic::MessageSummaryFoundStream) >= 1);
        assert!(report.opened_request.is_some());

        assert!(session.budget().is_exhausted());
        assert_eq!(report.records, session.budget().total() as usize);

        handle.shutdown();
        let stats = running.await.unwrap().unwrap();
        assert_eq!(stats.failures, 0);
    }
}
