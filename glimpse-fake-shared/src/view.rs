//! View shapes handed to subscribers.

use serde::{Deserialize, Serialize};

use crate::request::Request;

/// The request listing view.
///
/// `updated_requests` is never populated by the fake service: every batch is
/// reported as new, and `affected_requests` mirrors `new_requests`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsView {
    pub new_requests: Vec<Request>,
    pub updated_requests: Vec<Request>,
    pub affected_requests: Vec<Request>,
}

impl RequestsView {
    /// Build a view where every request is new.
    pub fn new_only(requests: Vec<Request>) -> Self {
        Self {
            affected_requests: requests.clone(),
            new_requests: requests,
            updated_requests: Vec::new(),
        }
    }
}
