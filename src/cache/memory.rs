//! In-memory cache for testing and for sharing results within a process.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::SimilarityCache;
use crate::error::Result;
use crate::similarity::CandidateMap;

/// An in-memory [`SimilarityCache`]. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySimilarityCache {
    slot: Arc<Mutex<Option<CandidateMap>>>,
}

impl MemorySimilarityCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache already holding a map.
    pub fn with_candidates(candidates: CandidateMap) -> Self {
        MemorySimilarityCache {
            slot: Arc::new(Mutex::new(Some(candidates))),
        }
    }

    /// Whether a map is stored.
    pub fn is_populated(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Drop the stored map.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}

impl SimilarityCache for MemorySimilarityCache {
    fn get(&self) -> Result<Option<CandidateMap>> {
        Ok(self.slot.lock().clone())
    }

    fn put(&self, candidates: &CandidateMap) -> Result<()> {
        *self.slot.lock() = Some(candidates.clone());
        Ok(())
    }
}
