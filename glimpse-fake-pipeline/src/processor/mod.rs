//! Processor module for the fake data pipeline.
//!
//! Turns raw generated records into the summary and detail views that are
//! published on the bus.

pub mod messages;
pub mod requests;

use glimpse_fake_shared::{Message, RawRequest, RequestsView};

use crate::errors::FakeError;

/// The transform applied to a summary batch before it is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTransform {
    /// Request listing, see [`requests::summary`].
    Requests,
    /// Flat message listing, see [`messages::summary`].
    Messages,
}

/// Result of a summary transform.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryView {
    Requests(RequestsView),
    Messages(Vec<Message>),
}

impl SummaryTransform {
    pub fn apply(self, records: Vec<RawRequest>) -> Result<SummaryView, FakeError> {
        match self {
            SummaryTransform::Requests => requests::summary(records).map(SummaryView::Requests),
            SummaryTransform::Messages => Ok(SummaryView::Messages(messages::summary(&records))),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use glimpse_fake_shared::{Request, RequestId};
    use serde_json::{json, Map, Value};
    use uuid::Uuid;

    pub(crate) fn plain_message() -> Message {
        Message::new(Uuid::new_v4(), 0, vec!["log-write".to_string()])
    }

    pub(crate) fn summary_message() -> Message {
        let mut message = Message::new(Uuid::new_v4(), 0, vec!["begin-request".to_string()]);
        let indices: Map<String, Value> = json!({ "request-url": "/Home/Index" })
            .as_object()
            .cloned()
            .unwrap();
        message.indices = Some(indices);
        message
    }

    /// A record whose request and detail lists both hold `messages`.
    pub(crate) fn record_with_messages(messages: Vec<Message>) -> RawRequest {
        let id = RequestId::from(Uuid::new_v4());
        RawRequest {
            id: id.clone(),
            request: Request {
                id,
                date_time: Utc::now(),
                method: "GET".to_string(),
                url: "/Home/Index".to_string(),
                status_code: 200,
                duration: 12,
                user: None,
                messages: messages.clone(),
            },
            messages,
        }
    }

    #[test]
    fn test_transform_dispatch() {
        let records = vec![record_with_messages(vec![summary_message(), plain_message()])];

        match SummaryTransform::Messages.apply(records.clone()).unwrap() {
            SummaryView::Messages(messages) => assert_eq!(messages.len(), 1),
            other => panic!("Expected messages view, got {:?}", other),
        }

        match SummaryTransform::Requests.apply(records).unwrap() {
            SummaryView::Requests(view) => assert_eq!(view.new_requests.len(), 1),
            other => panic!("Expected requests view, got {:?}", other),
        }
    }
}
