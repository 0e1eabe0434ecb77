//! Request view transforms.

use tracing::{debug, instrument};

use glimpse_fake_shared::{RawRequest, RequestsView};

use crate::errors::FakeError;

/// Build the request listing view for a batch of records.
///
/// The requests are handed to a client that expects hydrated payloads, so
/// every non-empty encoded payload is decoded in place. A malformed payload
/// fails the whole batch.
#[instrument(skip(records), fields(record_count = records.len()))]
pub fn summary(records: Vec<RawRequest>) -> Result<RequestsView, FakeError> {
    let mut requests = Vec::with_capacity(records.len());

    for record in records {
        let mut request = record.request;
        for message in &mut request.messages {
            let message_id = message.id;
            message
                .hydrate_payload()
                .map_err(|source| FakeError::MalformedPayload { message_id, source })?;
        }
        requests.push(request);
    }

    debug!(request_count = requests.len(), "Built request summary view");
    Ok(RequestsView::new_only(requests))
}

/// Build the request view for a single record.
pub fn detail(record: &RawRequest) -> RequestsView {
    RequestsView::new_only(vec![record.request.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::tests::{record_with_messages, summary_message};
    use glimpse_fake_shared::Payload;
    use serde_json::json;

    #[test]
    fn test_summary_reports_every_request_as_new() {
        let records = vec![record_with_messages(vec![]), record_with_messages(vec![])];
        let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();

        let view = summary(records).unwrap();

        assert_eq!(view.new_requests, view.affected_requests);
        assert!(view.updated_requests.is_empty());
        let view_ids: Vec<_> = view.new_requests.iter().map(|r| r.id.clone()).collect();
        assert_eq!(view_ids, ids);
    }

    #[test]
    fn test_summary_decodes_payloads() {
        let mut message = summary_message();
        message.payload = Some(Payload::Encoded(r#"{"a":1}"#.to_string()));

        let view = summary(vec![record_with_messages(vec![message])]).unwrap();

        assert_eq!(
            view.new_requests[0].messages[0].payload,
            Some(Payload::Decoded(json!({ "a": 1 })))
        );
    }

    #[test]
    fn test_summary_leaves_empty_payload() {
        let mut message = summary_message();
        message.payload = Some(Payload::Encoded(String::new()));

        let view = summary(vec![record_with_messages(vec![message])]).unwrap();

        assert_eq!(
            view.affected_requests[0].messages[0].payload,
            Some(Payload::Encoded(String::new()))
        );
    }

    #[test]
    fn test_summary_fails_on_malformed_payload() {
        let mut message = summary_message();
        message.payload = Some(Payload::Encoded("{\"a\":".to_string()));
        let message_id = message.id;

        let err = summary(vec![record_with_messages(vec![message])]).unwrap_err();

        match err {
            FakeError::MalformedPayload { message_id: id, .. } => assert_eq!(id, message_id),
            other => panic!("Expected malformed payload, got {:?}", other),
        }
    }

    #[test]
    fn test_detail_wraps_single_request() {
        let record = record_with_messages(vec![summary_message()]);

        let view = detail(&record);

        assert_eq!(view.new_requests, vec![record.request.clone()]);
        assert_eq!(view.affected_requests, view.new_requests);
        assert!(view.updated_requests.is_empty());
    }
}
