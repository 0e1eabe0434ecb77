//! Summary generation on the local, remote and stream channels.

use std::sync::Arc;

use glimpse_fake_shared::RawRequest;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::errors::FakeError;
use crate::generator::SummaryChannel;
use crate::processor::SummaryTransform;
use crate::session::Session;

/// Produces summary batches and publishes them on the bus.
#[derive(Clone)]
pub struct SummaryGenerator {
    session: Arc<Session>,
}

impl SummaryGenerator {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Generate, cache and publish one batch.
    ///
    /// The batch is clamped to what is left of the event budget; an empty
    /// batch is not published. Returns the number of records generated.
    #[instrument(skip(self, transform), fields(topic = %channel.topic()))]
    pub fn emit_batch(
        &self,
        count: u32,
        channel: SummaryChannel,
        base_offset_seconds: i64,
        transform: SummaryTransform,
    ) -> Result<u32, FakeError> {
        let budget = self.session.budget();
        let granted = budget.take(count);

        info!(
            kind = channel.kind(),
            source = channel.source(),
            emitted = budget.emitted(),
            total = budget.total(),
            remaining = budget.remaining(),
            batch = granted,
            "Summary batch"
        );

        if granted == 0 {
            debug!(requested = count, "Event budget exhausted, nothing to publish");
            return Ok(0);
        }

        let records = self.session.generate_records(granted, base_offset_seconds);
        self.publish_records(channel, records, transform)?;

        Ok(granted)
    }

    /// Cache a batch of records, transform it and publish it on `channel`.
    ///
    /// Records are cached before the transform runs, so a failing transform
    /// still leaves them available for detail lookups. Nothing is published
    /// on failure.
    pub fn publish_records(
        &self,
        channel: SummaryChannel,
        records: Vec<RawRequest>,
        transform: SummaryTransform,
    ) -> Result<usize, FakeError> {
        self.session.cache().insert_all(&records);

        let view = transform.apply(records)?;
        let event = channel.event(view)?;
        Ok(self.session.bus().publish(event))
    }

    /// Emit the local batch: a quarter of the budget, more than a day old.
    pub fn generate_local(&self) -> Result<u32, FakeError> {
        let config = self.session.config();
        let count = self.session.budget().share(config.local_share);
        self.emit_batch(
            count,
            SummaryChannel::Local,
            config.local_offset_seconds,
            SummaryChannel::Local.transform(),
        )
    }

    /// Emit the remote batch: thirty percent of the budget, seconds old.
    pub fn generate_remote(&self) -> Result<u32, FakeError> {
        let config = self.session.config();
        let count = self.session.budget().share(config.remote_share);
        self.emit_batch(
            count,
            SummaryChannel::Remote,
            config.remote_offset_seconds,
            SummaryChannel::Remote.transform(),
        )
    }

    /// Simulate requests loaded from the local store.
    pub async fn local(&self) -> Result<u32, FakeError> {
        self.session
            .sleep_random(&self.session.config().local_delay_ms)
            .await;
        self.generate_local()
    }

    /// Simulate message history arriving from the remote server.
    pub async fn remote(&self) -> Result<u32, FakeError> {
        self.session
            .sleep_random(&self.session.config().remote_delay_ms)
            .await;
        self.generate_remote()
    }

    /// Simulate the live stream until the budget runs out.
    ///
    /// Returns the number of ticks the stream ran for.
    pub async fn stream(&self) -> Result<u32, FakeError> {
        self.session
            .sleep_random(&self.session.config().stream_start_delay_ms)
            .await;
        StreamLoop::new(self.clone()).run().await
    }
}

/// Whether the stream loop schedules another tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// The repeating stream task.
///
/// Each tick emits one or two records; after each tick the loop waits a
/// random interval and keeps going only while the event budget has
/// something left.
pub struct StreamLoop {
    generator: SummaryGenerator,
    ticks: u32,
    emitted: u32,
}

impl StreamLoop {
    pub fn new(generator: SummaryGenerator) -> Self {
        Self {
            generator,
            ticks: 0,
            emitted: 0,
        }
    }

    /// Emit a single stream batch.
    pub fn tick(&mut self) -> Result<u32, FakeError> {
        let session = self.generator.session();
        let config = session.config();
        let count = session.with_rng(|rng| {
            if rng.gen_bool(config.stream_pair_probability) {
                2
            } else {
                1
            }
        });

        let emitted = self.generator.emit_batch(
            count,
            SummaryChannel::Stream,
            config.stream_offset_seconds,
            SummaryChannel::Stream.transform(),
        )?;

        self.ticks += 1;
        self.emitted += emitted;
        Ok(emitted)
    }

    /// Decide whether another tick is due.
    pub fn control(&self) -> LoopControl {
        if self.generator.session().budget().remaining() > 0 {
            LoopControl::Continue
        } else {
            LoopControl::Stop
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    /// Run ticks until the budget is exhausted or a tick fails.
    pub async fn run(mut self) -> Result<u32, FakeError> {
        loop {
            self.tick()?;

            let session = self.generator.session().clone();
            session.sleep_random(&session.config().stream_interval_ms).await;

            if self.control() == LoopControl::Stop {
                break;
            }
        }

        info!(ticks = self.ticks, emitted = self.emitted, "Stream stopped");
        Ok(self.ticks)
    }
}
