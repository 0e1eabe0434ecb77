//! Session state shared by the generators.
//!
//! A session owns everything that lives for the lifetime of the fake
//! service: the raw request cache, the event budget, the RNG and handles to
//! the bus, clock and delay. It is created once by the composition root and
//! shared behind an `Arc`.

use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use glimpse_fake_shared::RawRequest;
use mock_glimpse::{MockConfig, MockGlimpse};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::budget::EventBudget;
use crate::bus::EventBus;
use crate::cache::RequestCache;
use crate::clock::{Clock, Delay, SystemClock, TokioDelay};
use crate::generator::GeneratorConfig;

pub struct Session {
    config: GeneratorConfig,
    cache: RequestCache,
    budget: EventBudget,
    rng: Mutex<StdRng>,
    mock: MockGlimpse,
    clock: Arc<dyn Clock>,
    delay: Arc<dyn Delay>,
    bus: Arc<EventBus>,
}

impl Session {
    /// Start building a session that publishes on `bus`.
    pub fn builder(bus: Arc<EventBus>) -> SessionBuilder {
        SessionBuilder::new(bus)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn budget(&self) -> &EventBudget {
        &self.budget
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Run `f` with exclusive access to the session RNG.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *rng)
    }

    /// Draw a delay from a millisecond range.
    pub fn random_delay(&self, range_ms: &RangeInclusive<u64>) -> Duration {
        Duration::from_millis(self.with_rng(|rng| rng.gen_range(range_ms.clone())))
    }

    /// Wait for a random delay drawn from a millisecond range.
    pub async fn sleep_random(&self, range_ms: &RangeInclusive<u64>) {
        let duration = self.random_delay(range_ms);
        self.delay.sleep(duration).await;
    }

    /// Generate `count` records, walking backwards in time from
    /// `now + base_offset_seconds` by a random step per record.
    pub fn generate_records(&self, count: u32, base_offset_seconds: i64) -> Vec<RawRequest> {
        let now = self.now();
        let step = self.config.record_step_seconds.clone();

        self.with_rng(|rng| {
            let mut offset = base_offset_seconds;
            (0..count)
                .map(|_| {
                    offset -= rng.gen_range(step.clone());
                    let date_time = now + TimeDelta::seconds(offset);
                    self.mock.mvc_request(&mut *rng, date_time)
                })
                .collect()
        })
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    bus: Arc<EventBus>,
    config: GeneratorConfig,
    mock_config: MockConfig,
    seed: Option<u64>,
    clock: Arc<dyn Clock>,
    delay: Arc<dyn Delay>,
}

impl SessionBuilder {
    fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            config: GeneratorConfig::default(),
            mock_config: MockConfig::default(),
            seed: None,
            clock: Arc::new(SystemClock),
            delay: Arc::new(TokioDelay),
        }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_mock_config(mut self, mock_config: MockConfig) -> Self {
        self.mock_config = mock_config;
        self
    }

    /// Seed the RNG for reproducible sessions.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// Build the session, drawing its event budget.
    pub fn build(self) -> Session {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let total = rng.gen_range(self.config.budget.clone());

        info!(budget = total, seed = ?self.seed, "Fake session created");

        Session {
            config: self.config,
            cache: RequestCache::new(),
            budget: EventBudget::new(total),
            rng: Mutex::new(rng),
            mock: MockGlimpse::new(self.mock_config),
            clock: self.clock,
            delay: self.delay,
            bus: self.bus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn session(seed: u64) -> Session {
        Session::builder(Arc::new(EventBus::new()))
            .with_seed(Some(seed))
            .with_clock(Arc::new(FixedClock(Utc::now())))
            .build()
    }

    #[test]
    fn test_budget_drawn_from_range() {
        for seed in 0..50 {
            let total = session(seed).budget().total();
            assert!((25..=35).contains(&total), "budget {} out of range", total);
        }
    }

    #[test]
    fn test_fixed_budget() {
        let session = Session::builder(Arc::new(EventBus::new()))
            .with_config(GeneratorConfig::default().with_budget(30, 30))
            .build();

        assert_eq!(session.budget().total(), 30);
    }

    #[test]
    fn test_generated_records_walk_backwards() {
        let session = session(4);
        let now = session.now();

        let records = session.generate_records(5, -10);

        assert_eq!(records.len(), 5);
        let mut previous = now + TimeDelta::seconds(-10);
        for record in &records {
            let gap = (previous - record.request.date_time).num_seconds();
            assert!((30..=300).contains(&gap), "step {} out of range", gap);
            previous = record.request.date_time;
        }
    }

    #[test]
    fn test_mock_config_shapes_records() {
        let session = Session::builder(Arc::new(EventBus::new()))
            .with_seed(Some(6))
            .with_mock_config(MockConfig::default().with_commands(0, 0).with_log_writes(0, 0))
            .build();

        for record in session.generate_records(4, 0) {
            let types: Vec<&str> = record.messages.iter().map(|m| m.types[0].as_str()).collect();
            assert_eq!(types, vec!["begin-request", "action-route", "end-request"]);
        }
    }

    #[test]
    fn test_random_delay_in_range() {
        let session = session(8);

        for _ in 0..100 {
            let delay = session.random_delay(&(50..=100));
            assert!(delay >= Duration::from_millis(50) && delay <= Duration::from_millis(100));
        }
    }

    #[test]
    fn test_same_seed_same_records() {
        let now = Utc::now();
        let build = || {
            Session::builder(Arc::new(EventBus::new()))
                .with_seed(Some(21))
                .with_clock(Arc::new(FixedClock(now)))
                .build()
        };

        assert_eq!(build().generate_records(3, 0), build().generate_records(3, 0));
    }
}
