//! Mocked inbound surfaces: HTTP routes and the real-time hub.

mod http;
mod hub;

pub use http::{Method, MockRequest, MockResponse, MockRoute};
pub use hub::HubTopic;
