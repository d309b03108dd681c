//! Persistence of computed similarity candidates.
//!
//! Scoring a large vocabulary is quadratic, so computed [`CandidateMap`]s are
//! stored behind the [`SimilarityCache`] trait and reused on the next run.
//! Backends are chosen by the caller and carry their own location; there is
//! no process-wide cache path.

pub mod file;
pub mod memory;

use crate::error::Result;
use crate::similarity::CandidateMap;

pub use file::{CacheSnapshot, FileSimilarityCache};
pub use memory::MemorySimilarityCache;

/// A get/put store for one candidate map.
///
/// Implementations must round-trip maps exactly, including list order.
pub trait SimilarityCache: Send + Sync + std::fmt::Debug {
    /// Load the stored map. `Ok(None)` means nothing is stored.
    fn get(&self) -> Result<Option<CandidateMap>>;

    /// Store a map, replacing any previous one.
    fn put(&self, candidates: &CandidateMap) -> Result<()>;
}

/// A cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl SimilarityCache for NoCache {
    fn get(&self) -> Result<Option<CandidateMap>> {
        Ok(None)
    }

    fn put(&self, _candidates: &CandidateMap) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::CandidateEdge;

    #[test]
    fn test_no_cache_always_misses() {
        let cache = NoCache;
        let map = CandidateMap::from_lists([("cat", vec![CandidateEdge::new("cart", 0.75)])]);

        cache.put(&map).unwrap();
        assert!(cache.get().unwrap().is_none());
    }
}
