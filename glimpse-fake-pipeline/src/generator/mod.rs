//! Summary and detail generators.
//!
//! Summaries are produced on three simulated channels: records read from
//! the local store, history fetched from the remote server and messages
//! pushed by the live stream. Details are produced on request for records a
//! summary already announced.

mod detail;
mod summary;

pub use detail::DetailGenerator;
pub use summary::{LoopControl, StreamLoop, SummaryGenerator};

use std::ops::RangeInclusive;

use crate::bus::{Event, Topic};
use crate::errors::FakeError;
use crate::processor::{SummaryTransform, SummaryView};

/// Timing, sizing and offsets for the generators.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Range the session's total event budget is drawn from.
    pub budget: RangeInclusive<u32>,
    /// Step between consecutive record timestamps, in seconds.
    pub record_step_seconds: RangeInclusive<i64>,

    pub local_delay_ms: RangeInclusive<u64>,
    /// Share of the budget emitted by the local batch.
    pub local_share: f64,
    /// Local records are more than a day old.
    pub local_offset_seconds: i64,

    pub remote_delay_ms: RangeInclusive<u64>,
    /// Share of the budget emitted by the remote batch.
    pub remote_share: f64,
    /// Remote records are more than ten seconds old.
    pub remote_offset_seconds: i64,

    /// Delay before the first stream tick.
    pub stream_start_delay_ms: RangeInclusive<u64>,
    /// Delay between stream ticks.
    pub stream_interval_ms: RangeInclusive<u64>,
    /// Probability that a stream tick emits two records instead of one.
    pub stream_pair_probability: f64,
    pub stream_offset_seconds: i64,

    pub detail_delay_ms: RangeInclusive<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            budget: 25..=35,
            record_step_seconds: 30..=300,
            local_delay_ms: 50..=100,
            local_share: 0.25,
            local_offset_seconds: -25 * 60 * 60,
            remote_delay_ms: 2000..=2500,
            remote_share: 0.3,
            remote_offset_seconds: -10,
            stream_start_delay_ms: 4000..=6000,
            stream_interval_ms: 500..=15000,
            stream_pair_probability: 0.25,
            stream_offset_seconds: 0,
            detail_delay_ms: 2000..=3000,
        }
    }
}

impl GeneratorConfig {
    /// Set the range the event budget is drawn from.
    pub fn with_budget(mut self, min: u32, max: u32) -> Self {
        self.budget = min..=max;
        self
    }

    /// Set the probability of a two-record stream tick.
    pub fn with_stream_pair_probability(mut self, probability: f64) -> Self {
        self.stream_pair_probability = probability;
        self
    }

    /// Set the delay between stream ticks.
    pub fn with_stream_interval_ms(mut self, min: u64, max: u64) -> Self {
        self.stream_interval_ms = min..=max;
        self
    }
}

/// A simulated origin of summary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryChannel {
    /// Requests read from the local store.
    Local,
    /// Message history fetched from the remote server.
    Remote,
    /// Messages pushed by the live stream.
    Stream,
}

impl SummaryChannel {
    /// The topic this channel publishes on.
    pub fn topic(self) -> Topic {
        match self {
            SummaryChannel::Local => Topic::RequestSummaryFoundLocal,
            SummaryChannel::Remote => Topic::MessageSummaryFoundRemote,
            SummaryChannel::Stream => Topic::MessageSummaryFoundStream,
        }
    }

    /// The transform whose view this channel publishes.
    pub fn transform(self) -> SummaryTransform {
        match self {
            SummaryChannel::Local => SummaryTransform::Requests,
            SummaryChannel::Remote | SummaryChannel::Stream => SummaryTransform::Messages,
        }
    }

    /// Kind of data published, `request` or `message`.
    pub fn kind(self) -> &'static str {
        match self {
            SummaryChannel::Local => "request",
            SummaryChannel::Remote | SummaryChannel::Stream => "message",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            SummaryChannel::Local => "local",
            SummaryChannel::Remote => "remote",
            SummaryChannel::Stream => "stream",
        }
    }

    /// Wrap a view into this channel's event.
    ///
    /// Fails if the view was built by a transform this channel does not
    /// publish.
    pub fn event(self, view: SummaryView) -> Result<Event, FakeError> {
        match (self, view) {
            (SummaryChannel::Local, SummaryView::Requests(view)) => {
                Ok(Event::RequestSummaryFoundLocal(view))
            }
            (SummaryChannel::Remote, SummaryView::Messages(messages)) => {
                Ok(Event::MessageSummaryFoundRemote(messages))
            }
            (SummaryChannel::Stream, SummaryView::Messages(messages)) => {
                Ok(Event::MessageSummaryFoundStream(messages))
            }
            (channel, _) => Err(FakeError::contract(format!(
                "{} does not publish this view",
                channel.topic()
            ))),
        }
    }
}
