//! Random request record generation for the Glimpse fake service.
//!
//! Produces [`RawRequest`](glimpse_fake_shared::RawRequest) records that look
//! like a server-side MVC request: a begin/end pair, routing, a few data
//! store commands and log writes.
//!
//! # Usage
//!
//! ```rust
//! use chrono::Utc;
//! use mock_glimpse::{MockConfig, MockGlimpse};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mock = MockGlimpse::new(MockConfig::default().with_commands(0, 2));
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let record = mock.mvc_request(&mut rng, Utc::now());
//! assert_eq!(record.id, record.request.id);
//! ```
//!
//! Every random choice is drawn from the caller's RNG, so a seeded RNG gives
//! reproducible records.

pub mod generator;
pub mod vocab;

pub use generator::{MockConfig, MockGlimpse};
