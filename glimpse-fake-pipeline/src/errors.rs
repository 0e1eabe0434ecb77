//! Error types for the fake data pipeline.

use thiserror::Error;
use uuid::Uuid;

use glimpse_fake_shared::RequestId;

/// Errors that can occur while generating or publishing fake data.
#[derive(Error, Debug)]
pub enum FakeError {
    /// A caller broke the pipeline's contract, e.g. asked for the detail of
    /// a request that was never summarized.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// A message payload is not valid JSON.
    #[error("Malformed payload in message {message_id}: {source}")]
    MalformedPayload {
        message_id: Uuid,
        #[source]
        source: serde_json::Error,
    },

    /// A trigger or response channel was closed.
    #[error("Channel error: {0}")]
    ChannelClosed(String),
}

impl FakeError {
    /// Create a contract violation error.
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    /// Create the contract violation raised for an unknown detail id.
    pub fn unknown_request(id: &RequestId) -> Self {
        Self::contract(format!(
            "requested detail for request {} with no known summary",
            id
        ))
    }

    /// Create a channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::ChannelClosed(msg.into())
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ContractViolation(_))
    }

    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, Self::MalformedPayload { .. })
    }
}
