//! Mock request generator.
//!
//! Builds MVC-style request records from a caller supplied RNG.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use glimpse_fake_shared::{Message, Payload, RawRequest, Request, RequestId, User};
use rand::Rng;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::vocab::{pick, ACTIONS, CONTROLLERS, LOG_LINES, METHODS, STATUS_CODES, TABLES, USERS};

/// Configuration for the mock request generator.
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Number of data store commands per request.
    pub commands: RangeInclusive<usize>,
    /// Number of log writes per request.
    pub log_writes: RangeInclusive<usize>,
    /// Request duration in milliseconds.
    pub duration_ms: RangeInclusive<u64>,
    /// Probability that a request has no authenticated user.
    pub anonymous_probability: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            commands: 0..=3,
            log_writes: 0..=2,
            duration_ms: 5..=2500,
            anonymous_probability: 0.2,
        }
    }
}

impl MockConfig {
    /// Set the range of data store commands per request.
    pub fn with_commands(mut self, min: usize, max: usize) -> Self {
        self.commands = min..=max;
        self
    }

    /// Set the range of log writes per request.
    pub fn with_log_writes(mut self, min: usize, max: usize) -> Self {
        self.log_writes = min..=max;
        self
    }

    /// Set the range of request durations.
    pub fn with_duration_ms(mut self, min: u64, max: u64) -> Self {
        self.duration_ms = min..=max;
        self
    }
}

/// Generates fake request records.
#[derive(Debug, Clone, Default)]
pub struct MockGlimpse {
    config: MockConfig,
}

impl MockGlimpse {
    /// Create a generator with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Generate a single MVC request record started at `date_time`.
    ///
    /// The full message list is kept on the record; the request itself only
    /// carries the messages that belong in summary listings.
    pub fn mvc_request<R: Rng>(&self, rng: &mut R, date_time: DateTime<Utc>) -> RawRequest {
        let id = RequestId::from(random_uuid(rng));
        let controller = *pick(rng, CONTROLLERS);
        let action = *pick(rng, ACTIONS);
        let method = (*pick(rng, METHODS)).to_string();
        let url = if rng.gen_bool(0.3) {
            format!("/{}/{}/{}", controller, action, rng.gen_range(1..1000))
        } else {
            format!("/{}/{}", controller, action)
        };
        let status_code = *pick(rng, STATUS_CODES);
        let duration = rng.gen_range(self.config.duration_ms.clone());
        let user = if rng.gen_bool(self.config.anonymous_probability) {
            None
        } else {
            let (user_id, name) = *pick(rng, USERS);
            Some(User {
                id: user_id.to_string(),
                name: name.to_string(),
            })
        };

        let mut builder = MessageBuilder::default();

        builder.push(
            rng,
            "begin-request",
            json!({ "url": url, "method": method, "startTime": date_time }),
            object(json!({ "request-url": url, "request-method": method, "request-datetime": date_time })),
            None,
        );
        builder.push(
            rng,
            "action-route",
            json!({ "controller": controller, "action": action }),
            None,
            object(json!({ "controller": controller, "action": action })),
        );

        for _ in 0..rng.gen_range(self.config.commands.clone()) {
            let table = *pick(rng, TABLES);
            let command = format!("SELECT * FROM [{}] WHERE [Id] = @p0", table);
            let command_duration = rng.gen_range(1..=duration.max(1));
            builder.push(
                rng,
                "data-store-command",
                json!({ "commandText": command, "duration": command_duration }),
                None,
                object(json!({ "table": table, "duration": command_duration })),
            );
        }

        for _ in 0..rng.gen_range(self.config.log_writes.clone()) {
            let line = *pick(rng, LOG_LINES);
            builder.push(rng, "log-write", json!({ "message": line }), None, None);
        }

        builder.push(
            rng,
            "end-request",
            json!({ "statusCode": status_code, "duration": duration }),
            object(json!({ "request-status-code": status_code, "request-duration": duration })),
            None,
        );

        let messages = builder.finish();
        let request = Request {
            id: id.clone(),
            date_time,
            method,
            url,
            status_code,
            duration,
            user,
            messages: messages.iter().filter(|m| m.is_summary()).cloned().collect(),
        };

        RawRequest { id, request, messages }
    }
}

#[derive(Default)]
struct MessageBuilder {
    messages: Vec<Message>,
}

impl MessageBuilder {
    fn push<R: Rng>(
        &mut self,
        rng: &mut R,
        kind: &str,
        payload: Value,
        indices: Option<Map<String, Value>>,
        summary: Option<Map<String, Value>>,
    ) {
        let ordinal = self.messages.len() as u32;
        let mut message = Message::new(random_uuid(rng), ordinal, vec![kind.to_string()]);
        message.payload = Some(Payload::Encoded(payload.to_string()));
        message.indices = indices;
        message.r#abstract = summary;
        self.messages.push(message);
    }

    fn finish(self) -> Vec<Message> {
        self.messages
    }
}

fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

fn object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(seed: u64) -> RawRequest {
        let mock = MockGlimpse::default();
        let mut rng = StdRng::seed_from_u64(seed);
        mock.mvc_request(&mut rng, Utc::now())
    }

    #[test]
    fn test_record_ids_match() {
        let record = generate(1);
        assert_eq!(record.id, record.request.id);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let now = Utc::now();
        let mock = MockGlimpse::default();

        let first = mock.mvc_request(&mut StdRng::seed_from_u64(42), now);
        let second = mock.mvc_request(&mut StdRng::seed_from_u64(42), now);

        assert_eq!(first, second);
    }

    #[test]
    fn test_messages_are_ordered_and_bracketed() {
        let record = generate(3);
        let first = record.messages.first().unwrap();
        let last = record.messages.last().unwrap();

        assert_eq!(first.types, vec!["begin-request".to_string()]);
        assert_eq!(last.types, vec!["end-request".to_string()]);
        for (i, message) in record.messages.iter().enumerate() {
            assert_eq!(message.ordinal, i as u32);
        }
    }

    #[test]
    fn test_request_carries_only_summary_messages() {
        let mock = MockGlimpse::new(MockConfig::default().with_log_writes(2, 2));
        let mut rng = StdRng::seed_from_u64(9);
        let record = mock.mvc_request(&mut rng, Utc::now());

        assert!(record.request.messages.iter().all(|m| m.is_summary()));
        assert_eq!(
            record.messages.len() - record.request.messages.len(),
            2,
            "log writes have neither indices nor abstract"
        );
    }

    #[test]
    fn test_payloads_are_encoded_json() {
        let record = generate(11);

        for message in &record.messages {
            match &message.payload {
                Some(Payload::Encoded(text)) => {
                    assert!(serde_json::from_str::<Value>(text).is_ok());
                }
                other => panic!("Expected encoded payload, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_duration_within_configured_range() {
        let mock = MockGlimpse::new(MockConfig::default().with_duration_ms(10, 20));
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let record = mock.mvc_request(&mut rng, Utc::now());
            assert!((10..=20).contains(&record.request.duration));
        }
    }
}
