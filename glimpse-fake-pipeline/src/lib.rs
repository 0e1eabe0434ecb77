//! # Glimpse Fake Pipeline
//!
//! This crate provides the components of the Glimpse fake data service:
//! it fabricates request records and publishes them to the client as if
//! they came from a local store, a remote server and a live stream.
//!
//! ## Architecture
//!
//! The pipeline follows a Generator-Processor-Bus pattern:
//!
//! 1. **Generator**: Produces raw request records within an event budget
//! 2. **Processor**: Transforms records into request or message summaries
//! 3. **Bus**: Publishes the resulting events to subscribers
//! 4. **Orchestrator**: Wires triggers (shell ready, HTTP, hub) to generators

pub mod budget;
pub mod bus;
pub mod cache;
pub mod clock;
pub mod errors;
pub mod generator;
pub mod mock;
pub mod orchestrator;
pub mod processor;
pub mod relay;
pub mod session;

pub use errors::FakeError;
