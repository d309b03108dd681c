//! Parallel all-pairs lexical similarity.
//!
//! The [`computer::SimilarityComputer`] scores every unordered pair of a
//! vocabulary with the normalized edit distance and keeps the pairs above a
//! threshold as [`CandidateEdge`]s. The result is a [`CandidateMap`] that is
//! symmetric by construction and must be sorted with
//! [`CandidateMap::sort_descending`] before a graph is built from it.

pub mod cancel;
pub mod computer;
pub mod progress;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{LexipathError, Result};

pub use cancel::CancellationToken;
pub use computer::SimilarityComputer;
pub use progress::{LogProgress, NoopProgress, ProgressObserver};

/// Default similarity threshold. Only pairs scoring strictly above it are kept.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// A scored relation from some source word to `word`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEdge {
    /// The neighboring word.
    pub word: String,
    /// Similarity score, in `(threshold, 1.0]`.
    pub score: f64,
}

impl CandidateEdge {
    /// Create a new candidate edge.
    pub fn new<S: Into<String>>(word: S, score: f64) -> Self {
        CandidateEdge {
            word: word.into(),
            score,
        }
    }

    /// Ordering used for candidate lists: higher scores first, ties broken by
    /// word so that sorting is deterministic.
    pub fn strongest_first(a: &CandidateEdge, b: &CandidateEdge) -> Ordering {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.word.cmp(&b.word))
    }
}

/// Per-word candidate lists, keyed and iterated in word order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMap {
    lists: BTreeMap<String, Vec<CandidateEdge>>,
    /// Threshold every stored score is known to exceed, if recorded.
    threshold: Option<f64>,
}

impl CandidateMap {
    /// Create an empty map.
    pub fn new() -> Self {
        CandidateMap {
            lists: BTreeMap::new(),
            threshold: None,
        }
    }

    /// Build a map from (word, candidates) pairs.
    pub fn from_lists<I, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<CandidateEdge>)>,
        S: Into<String>,
    {
        CandidateMap {
            lists: lists.into_iter().map(|(w, l)| (w.into(), l)).collect(),
            threshold: None,
        }
    }

    /// Record the threshold the scores were filtered with.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Threshold every score is known to exceed. `None` for maps assembled
    /// by hand or loaded from elsewhere.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Drop every candidate scoring at or below `threshold` and return how
    /// many were dropped. List order is preserved.
    pub fn retain_above(&mut self, threshold: f64) -> usize {
        let mut dropped = 0;
        for list in self.lists.values_mut() {
            let before = list.len();
            list.retain(|edge| edge.score > threshold);
            dropped += before - list.len();
        }

        if self.threshold.is_none_or(|current| current < threshold) {
            self.threshold = Some(threshold);
        }
        dropped
    }

    /// Register a word with no candidates, if not present yet.
    pub fn insert_word<S: Into<String>>(&mut self, word: S) {
        self.lists.entry(word.into()).or_default();
    }

    /// Append a candidate to a word's list, registering the word if needed.
    pub fn push<S: Into<String>>(&mut self, word: S, edge: CandidateEdge) {
        self.lists.entry(word.into()).or_default().push(edge);
    }

    /// Candidate list of a word.
    pub fn get(&self, word: &str) -> Option<&[CandidateEdge]> {
        self.lists.get(word).map(Vec::as_slice)
    }

    /// Iterate over (word, candidates) in word order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CandidateEdge])> {
        self.lists.iter().map(|(w, l)| (w.as_str(), l.as_slice()))
    }

    /// All words that have an entry, in order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether the map has no words.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Total number of directed candidate entries (twice the number of pairs
    /// for a symmetric map).
    pub fn entry_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// Sort every list strongest first, ties by word.
    pub fn sort_descending(&mut self) {
        self.lists
            .par_iter_mut()
            .for_each(|(_, list)| list.sort_by(CandidateEdge::strongest_first));
    }

    /// Whether no list has a score larger than the one before it. Equal
    /// scores may appear in any word order.
    pub fn is_sorted_descending(&self) -> bool {
        self.lists.values().all(|list| {
            list.windows(2)
                .all(|w| w[0].score.total_cmp(&w[1].score) != Ordering::Less)
        })
    }
}

/// Configuration for similarity computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Pairs must score strictly above this value to be kept.
    pub threshold: f64,

    /// Thread pool size for parallel scoring.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,

    /// Number of scored pairs between two progress notifications.
    pub progress_interval: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        SimilarityConfig {
            threshold: DEFAULT_THRESHOLD,
            thread_pool_size: None,
            progress_interval: 1000,
        }
    }
}

impl SimilarityConfig {
    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(LexipathError::config(format!(
                "similarity threshold must be in [0, 1), got {}",
                self.threshold
            )));
        }
        if self.thread_pool_size == Some(0) {
            return Err(LexipathError::config("thread pool size must be at least 1"));
        }
        if self.progress_interval == 0 {
            return Err(LexipathError::config("progress interval must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_descending() {
        let mut map = CandidateMap::from_lists([(
            "cat",
            vec![
                CandidateEdge::new("cot", 0.5),
                CandidateEdge::new("cart", 0.75),
                CandidateEdge::new("bat", 0.75),
                CandidateEdge::new("coat", 0.4),
            ],
        )]);
        assert!(!map.is_sorted_descending());

        map.sort_descending();
        assert!(map.is_sorted_descending());

        let words: Vec<&str> = map
            .get("cat")
            .unwrap()
            .iter()
            .map(|e| e.word.as_str())
            .collect();
        assert_eq!(words, vec!["bat", "cart", "cot", "coat"]);
    }

    #[test]
    fn test_ties_in_any_word_order_count_as_sorted() {
        let map = CandidateMap::from_lists([(
            "cat",
            vec![
                CandidateEdge::new("cot", 2.0 / 3.0),
                CandidateEdge::new("bat", 2.0 / 3.0),
                CandidateEdge::new("cart", 0.5),
            ],
        )]);
        assert!(map.is_sorted_descending());
    }

    #[test]
    fn test_retain_above() {
        let mut map = CandidateMap::from_lists([
            (
                "cold",
                vec![
                    CandidateEdge::new("cord", 0.75),
                    CandidateEdge::new("worm", 0.25),
                ],
            ),
            ("worm", vec![CandidateEdge::new("cold", 0.25)]),
        ]);
        assert_eq!(map.threshold(), None);

        assert_eq!(map.retain_above(0.3), 2);
        assert_eq!(map.get("cold").unwrap(), &[CandidateEdge::new("cord", 0.75)][..]);
        assert!(map.get("worm").unwrap().is_empty());
        assert_eq!(map.threshold(), Some(0.3));

        // A looser threshold drops nothing and keeps the stricter record
        assert_eq!(map.retain_above(0.1), 0);
        assert_eq!(map.threshold(), Some(0.3));
    }

    #[test]
    fn test_insert_word_keeps_existing_list() {
        let mut map = CandidateMap::new();
        map.push("dog", CandidateEdge::new("dot", 0.6));
        map.insert_word("dog");
        map.insert_word("cat");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("dog").unwrap().len(), 1);
        assert!(map.get("cat").unwrap().is_empty());
        assert_eq!(map.entry_count(), 1);
    }

    #[test]
    fn test_config_validation() {
        assert!(SimilarityConfig::default().validate().is_ok());

        let config = SimilarityConfig {
            threshold: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimilarityConfig {
            thread_pool_size: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
