//! # Glimpse Fake Shared
//!
//! Request and message types shared by the fake data generator, the
//! simulator pipeline and the service binary.
//!
//! A [`RawRequest`] is the record produced by the generator. It carries the
//! [`Request`] shape used by request listings and the full list of
//! [`Message`] entries used by detail views.

pub mod message;
pub mod request;
pub mod view;

pub use message::{Message, Payload};
pub use request::{RawRequest, Request, RequestId, User};
pub use view::RequestsView;
