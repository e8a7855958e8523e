//! In-process memoization of ingested datasets backed by DashMap.
//! Entries are keyed on the content fingerprint of their sources, so a
//! changed input never hits a stale entry.

use crate::fingerprint::SourceFingerprint;
use dashmap::DashMap;
use pulse_core::PulseResult;
use pulse_ingest::Dataset;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

struct CacheEntry {
    dataset: Arc<Dataset>,
    seq: u64,
}

/// Bounded dataset cache. When full, the oldest entry is evicted.
pub struct DatasetCache {
    store: DashMap<SourceFingerprint, CacheEntry>,
    max_entries: usize,
    next_seq: AtomicU64,
}

impl DatasetCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: DashMap::with_capacity(max_entries),
            max_entries,
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn get(&self, fingerprint: &SourceFingerprint) -> Option<Arc<Dataset>> {
        self.store.get(fingerprint).map(|e| e.dataset.clone())
    }

    /// Insert a dataset, evicting the oldest entry if at capacity. A cache
    /// with zero capacity stores nothing.
    pub fn put(&self, fingerprint: SourceFingerprint, dataset: Arc<Dataset>) {
        if self.max_entries == 0 {
            return;
        }
        if self.store.len() >= self.max_entries && !self.store.contains_key(&fingerprint) {
            self.evict_oldest();
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.store.insert(fingerprint, CacheEntry { dataset, seq });
    }

    /// Return the memoized dataset for `fingerprint`, or run `load` and
    /// remember its result. Failed loads are not cached.
    pub fn get_or_ingest<F>(&self, fingerprint: &SourceFingerprint, load: F) -> PulseResult<Arc<Dataset>>
    where
        F: FnOnce() -> PulseResult<Dataset>,
    {
        if let Some(dataset) = self.get(fingerprint) {
            metrics::counter!("ingest.cache.hit").increment(1);
            debug!(fingerprint = fingerprint.short(), "Dataset cache hit");
            return Ok(dataset);
        }
        metrics::counter!("ingest.cache.miss").increment(1);
        debug!(fingerprint = fingerprint.short(), "Dataset cache miss, ingesting");

        let dataset = Arc::new(load()?);
        self.put(fingerprint.clone(), dataset.clone());
        Ok(dataset)
    }

    /// Drop the entry for `fingerprint`. Returns whether one existed.
    pub fn invalidate(&self, fingerprint: &SourceFingerprint) -> bool {
        self.store.remove(fingerprint).is_some()
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn evict_oldest(&self) {
        let oldest = self
            .store
            .iter()
            .min_by_key(|e| e.value().seq)
            .map(|e| e.key().clone());
        if let Some(key) = oldest {
            self.store.remove(&key);
            metrics::counter!("ingest.cache.evicted").increment(1);
        }
    }
}
