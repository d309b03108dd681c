//! Parallel all-pairs similarity scorer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use ahash::AHashSet;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{LexipathError, Result};
use crate::similarity::{
    CancellationToken, CandidateEdge, CandidateMap, NoopProgress, ProgressObserver,
    SimilarityConfig,
};
use crate::util::levenshtein::similarity_above;

/// Scores every unordered pair of a vocabulary on a dedicated thread pool.
///
/// Work is partitioned by row: row `i` pairs word `i` with every word after
/// it, so rows are independent of each other. Each row yields a private
/// partial result and the rows are merged in order after the pool joins,
/// which makes the output independent of the pool size and of scheduling.
pub struct SimilarityComputer {
    config: SimilarityConfig,
    thread_pool: Arc<ThreadPool>,
}

impl SimilarityComputer {
    /// Create a new computer with its own thread pool.
    pub fn new(config: SimilarityConfig) -> Result<Self> {
        config.validate()?;

        let thread_pool_size = config.thread_pool_size.unwrap_or_else(num_cpus::get);
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(thread_pool_size)
            .thread_name(|i| format!("similarity-{i}"))
            .build()
            .map_err(|e| LexipathError::internal(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            config,
            thread_pool: Arc::new(thread_pool),
        })
    }

    /// Create a computer that runs on an existing thread pool.
    pub fn with_thread_pool(config: SimilarityConfig, thread_pool: Arc<ThreadPool>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            thread_pool,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Score all pairs of `words` without progress reporting or cancellation.
    pub fn compute(&self, words: &[String]) -> Result<CandidateMap> {
        self.compute_with(words, &NoopProgress, &CancellationToken::new())
    }

    /// Score all pairs of `words`.
    ///
    /// Every word becomes a key of the returned map, even when none of its
    /// pairs clears the threshold. Lists are unsorted. Returns only once every
    /// pair has been scored, or with `OperationCancelled` if `cancel` fires.
    pub fn compute_with(
        &self,
        words: &[String],
        observer: &dyn ProgressObserver,
        cancel: &CancellationToken,
    ) -> Result<CandidateMap> {
        validate_words(words)?;

        let start_time = Instant::now();
        let n = words.len();
        let total_pairs = n * (n - 1) / 2;
        let threshold = self.config.threshold;
        let interval = self.config.progress_interval;
        let completed = AtomicUsize::new(0);

        log::info!(
            "Scoring {total_pairs} pairs of {n} words on {} threads",
            self.num_threads()
        );

        let rows: Vec<Vec<(usize, f64)>> = self.thread_pool.install(|| {
            (0..n)
                .into_par_iter()
                .map(|i| {
                    if cancel.is_cancelled() {
                        return Err(LexipathError::cancelled("similarity computation"));
                    }

                    let row = score_row(words, i, threshold);

                    let pairs = n - i - 1;
                    let before = completed.fetch_add(pairs, Ordering::Relaxed);
                    let after = before + pairs;
                    if before / interval != after / interval {
                        observer.on_progress(after, total_pairs);
                    }

                    Ok(row)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let candidates = merge_rows(words, rows).with_threshold(threshold);
        observer.on_complete(total_pairs);

        log::info!(
            "Found {} candidate relations in {:.2}s",
            candidates.entry_count() / 2,
            start_time.elapsed().as_secs_f64()
        );

        Ok(candidates)
    }
}

/// Reject empty and duplicated input.
fn validate_words(words: &[String]) -> Result<()> {
    if words.is_empty() {
        return Err(LexipathError::invalid_input("vocabulary is empty"));
    }

    let mut seen = AHashSet::with_capacity(words.len());
    for word in words {
        if !seen.insert(word.as_str()) {
            return Err(LexipathError::invalid_input(format!(
                "vocabulary contains '{word}' more than once"
            )));
        }
    }

    Ok(())
}

/// Score word `i` against every later word.
fn score_row(words: &[String], i: usize, threshold: f64) -> Vec<(usize, f64)> {
    let word = &words[i];
    words[i + 1..]
        .iter()
        .enumerate()
        .filter_map(|(offset, other)| {
            similarity_above(word, other, threshold).map(|score| (i + 1 + offset, score))
        })
        .collect()
}

/// Merge per-row partials into a symmetric candidate map.
fn merge_rows(words: &[String], rows: Vec<Vec<(usize, f64)>>) -> CandidateMap {
    let mut lists: Vec<Vec<CandidateEdge>> = vec![Vec::new(); words.len()];

    for (i, row) in rows.into_iter().enumerate() {
        for (j, score) in row {
            lists[i].push(CandidateEdge::new(words[j].clone(), score));
            lists[j].push(CandidateEdge::new(words[i].clone(), score));
        }
    }

    CandidateMap::from_lists(words.iter().cloned().zip(lists))
}
