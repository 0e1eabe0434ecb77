//! Detail generation for previously summarized requests.

use std::sync::Arc;

use glimpse_fake_shared::RequestId;
use tracing::{info, instrument};

use crate::bus::Event;
use crate::errors::FakeError;
use crate::processor::messages;
use crate::session::Session;

/// Publishes the full message list of a cached request.
#[derive(Clone)]
pub struct DetailGenerator {
    session: Arc<Session>,
}

impl DetailGenerator {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Simulate fetching a request's messages from the remote server.
    pub async fn remote(&self, id: RequestId) -> Result<usize, FakeError> {
        self.session
            .sleep_random(&self.session.config().detail_delay_ms)
            .await;
        self.publish_remote(&id)
    }

    /// Look up a cached request and publish its messages.
    ///
    /// Asking for an id that no summary announced is a contract violation.
    /// Returns the number of messages published.
    #[instrument(skip(self), fields(request_id = %id))]
    pub fn publish_remote(&self, id: &RequestId) -> Result<usize, FakeError> {
        let record = self
            .session
            .cache()
            .get(id)
            .ok_or_else(|| FakeError::unknown_request(id))?;

        let messages = messages::detail(&record);
        let count = messages.len();
        self.session.bus().publish(Event::MessageDetailFoundRemote(messages));

        info!(message_count = count, "Detail published");
        Ok(count)
    }
}
