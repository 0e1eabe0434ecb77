//! Mocked HTTP surface.
//!
//! Stands in for the data endpoints the client calls. Requests are matched
//! against a fixed route table; the matched route decides which generator
//! runs. Response bodies are not produced: the generated data is delivered
//! through the bus instead.

use std::fmt;

use glimpse_fake_shared::RequestId;

const HISTORY_PATH: [&str; 3] = ["glimpse", "data", "history"];
const MESSAGES_PATH: [&str; 3] = ["glimpse", "data", "messages"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A request made against the mocked HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
}

impl MockRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
        }
    }
}

/// A matched route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRoute {
    /// `GET /glimpse/data/history`
    History,
    /// `GET /glimpse/data/messages/:id`
    MessageById(RequestId),
}

impl MockRoute {
    /// Match a request against the route table.
    ///
    /// Query strings and a trailing slash are ignored.
    pub fn resolve(request: &MockRequest) -> Option<MockRoute> {
        if request.method != Method::Get {
            return None;
        }

        let path = request.path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [a, b, c] if [*a, *b, *c] == HISTORY_PATH => Some(MockRoute::History),
            [a, b, c, id] if [*a, *b, *c] == MESSAGES_PATH => {
                Some(MockRoute::MessageById(RequestId::new(*id)))
            }
            _ => None,
        }
    }
}

/// Response returned by the mocked HTTP surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: u16,
    /// Always empty; data is delivered on the bus.
    pub body: Option<serde_json::Value>,
}

impl MockResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            body: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_history() {
        assert_eq!(
            MockRoute::resolve(&MockRequest::get("/glimpse/data/history")),
            Some(MockRoute::History)
        );
        assert_eq!(
            MockRoute::resolve(&MockRequest::get("/glimpse/data/history/?top=10")),
            Some(MockRoute::History)
        );
    }

    #[test]
    fn test_resolve_message_by_id() {
        assert_eq!(
            MockRoute::resolve(&MockRequest::get("/glimpse/data/messages/1234")),
            Some(MockRoute::MessageById(RequestId::new("1234")))
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_routes() {
        assert_eq!(MockRoute::resolve(&MockRequest::get("/glimpse/data/messages")), None);
        assert_eq!(MockRoute::resolve(&MockRequest::get("/glimpse/data/messages/1/2")), None);
        assert_eq!(MockRoute::resolve(&MockRequest::get("/glimpse/metadata")), None);

        let post = MockRequest {
            method: Method::Post,
            path: "/glimpse/data/history".to_string(),
        };
        assert_eq!(MockRoute::resolve(&post), None);
    }

    #[test]
    fn test_responses() {
        assert!(MockResponse::ok().is_success());
        assert!(!MockResponse::not_found().is_success());
        assert!(MockResponse::ok().body.is_none());
    }
}
