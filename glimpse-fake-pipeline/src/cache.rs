//! Raw request cache.
//!
//! Holds every generated record by id so a later detail request can find it.
//! Records are never evicted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use glimpse_fake_shared::{RawRequest, RequestId};

#[derive(Debug, Default)]
pub struct RequestCache {
    records: Mutex<HashMap<RequestId, RawRequest>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<RequestId, RawRequest>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert records, replacing any with the same id.
    pub fn insert_all<'a>(&self, records: impl IntoIterator<Item = &'a RawRequest>) {
        let mut cache = self.records();
        for record in records {
            cache.insert(record.id.clone(), record.clone());
        }
    }

    /// Look up a record by id.
    pub fn get(&self, id: &RequestId) -> Option<RawRequest> {
        self.records().get(id).cloned()
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.records().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of every cached record, in no particular order.
    pub fn ids(&self) -> Vec<RequestId> {
        self.records().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mock_glimpse::MockGlimpse;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn records(count: usize) -> Vec<RawRequest> {
        let mock = MockGlimpse::default();
        let mut rng = StdRng::seed_from_u64(1);
        (0..count).map(|_| mock.mvc_request(&mut rng, Utc::now())).collect()
    }

    #[test]
    fn test_insert_and_get() {
        let cache = RequestCache::new();
        let batch = records(3);

        cache.insert_all(&batch);

        assert_eq!(cache.len(), 3);
        for record in &batch {
            assert_eq!(cache.get(&record.id).as_ref(), Some(record));
        }
    }

    #[test]
    fn test_get_unknown_id() {
        let cache = RequestCache::new();
        cache.insert_all(&records(1));

        assert!(cache.get(&RequestId::new("missing")).is_none());
        assert!(!cache.contains(&RequestId::new("missing")));
    }

    #[test]
    fn test_reinsert_keeps_single_entry() {
        let cache = RequestCache::new();
        let batch = records(2);

        cache.insert_all(&batch);
        cache.insert_all(&batch);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.ids().len(), 2);
    }
}
