//! Message entries attached to a request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A message payload.
///
/// Generated records carry their payload as an encoded JSON string. Views
/// that are handed to a client decode it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// JSON text as produced by the generator.
    Encoded(String),
    /// Parsed JSON value.
    Decoded(Value),
}

impl Payload {
    /// Returns true if this is an encoded payload with non-empty text.
    pub fn needs_decoding(&self) -> bool {
        matches!(self, Payload::Encoded(text) if !text.is_empty())
    }
}

/// A single message recorded during a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// Position of the message within its request.
    pub ordinal: u32,
    /// Message type tags, e.g. `begin-request`.
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    /// Values this message contributes to request indexes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Map<String, Value>>,
    /// Short description shown in summary listings.
    #[serde(default, rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub r#abstract: Option<Map<String, Value>>,
}

impl Message {
    /// Create a message with no payload, indices or abstract.
    pub fn new(id: Uuid, ordinal: u32, types: Vec<String>) -> Self {
        Self {
            id,
            ordinal,
            types,
            payload: None,
            indices: None,
            r#abstract: None,
        }
    }

    /// Whether the message belongs in a summary listing.
    ///
    /// Only messages with non-empty indices or a non-empty abstract qualify.
    pub fn is_summary(&self) -> bool {
        let non_empty = |map: &Option<Map<String, Value>>| map.as_ref().is_some_and(|m| !m.is_empty());
        non_empty(&self.indices) || non_empty(&self.r#abstract)
    }

    /// Decode an encoded, non-empty payload in place.
    ///
    /// Empty and already decoded payloads are left untouched. On a parse
    /// failure the payload keeps its original text.
    pub fn hydrate_payload(&mut self) -> Result<(), serde_json::Error> {
        if let Some(Payload::Encoded(text)) = self.payload.as_ref().filter(|p| p.needs_decoding()) {
            let value = serde_json::from_str(text)?;
            self.payload = Some(Payload::Decoded(value));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message() -> Message {
        Message::new(Uuid::new_v4(), 0, vec!["log-write".to_string()])
    }

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_is_summary_requires_indices_or_abstract() {
        let mut msg = message();
        assert!(!msg.is_summary());

        msg.indices = Some(Map::new());
        msg.r#abstract = Some(Map::new());
        assert!(!msg.is_summary());

        msg.indices = Some(map(json!({ "request-url": "/" })));
        assert!(msg.is_summary());

        msg.indices = None;
        msg.r#abstract = Some(map(json!({ "action": "Index" })));
        assert!(msg.is_summary());
    }

    #[test]
    fn test_hydrate_payload_decodes_json() {
        let mut msg = message();
        msg.payload = Some(Payload::Encoded(r#"{"a":1}"#.to_string()));

        msg.hydrate_payload().unwrap();

        assert_eq!(msg.payload, Some(Payload::Decoded(json!({ "a": 1 }))));
    }

    #[test]
    fn test_hydrate_payload_leaves_empty_string() {
        let mut msg = message();
        msg.payload = Some(Payload::Encoded(String::new()));

        msg.hydrate_payload().unwrap();

        assert_eq!(msg.payload, Some(Payload::Encoded(String::new())));
    }

    #[test]
    fn test_hydrate_payload_rejects_malformed_json() {
        let mut msg = message();
        msg.payload = Some(Payload::Encoded("{not json".to_string()));

        assert!(msg.hydrate_payload().is_err());
        assert_eq!(msg.payload, Some(Payload::Encoded("{not json".to_string())));
    }

    #[test]
    fn test_serializes_abstract_field_name() {
        let mut msg = message();
        msg.r#abstract = Some(map(json!({ "action": "Index" })));

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["abstract"]["action"], "Index");
        assert!(value.get("payload").is_none());
    }
}
