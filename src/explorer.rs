//! End-to-end pipeline from vocabulary to path queries.
//!
//! [`WordExplorer`] filters a vocabulary, takes candidates from the cache or
//! computes them, sorts them, stores fresh results back in the cache and
//! builds the graph. Cache failures never abort the pipeline: a failed read
//! is a miss and a failed write is only logged.

use serde::{Deserialize, Serialize};

use crate::cache::SimilarityCache;
use crate::config::ExplorerConfig;
use crate::error::{LexipathError, Result};
use crate::graph::{GraphBuilder, GraphStats, PathResult, WordGraph};
use crate::similarity::{
    CancellationToken, CandidateEdge, CandidateMap, LogProgress, ProgressObserver,
    SimilarityComputer,
};
use crate::vocabulary::Vocabulary;

/// Where the candidates of an explorer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    /// Loaded from the similarity cache.
    Cache,
    /// Computed in this run.
    Computed,
}

/// Options controlling how candidates are obtained.
pub struct BuildOptions<'a> {
    /// Receives similarity progress.
    pub observer: &'a dyn ProgressObserver,
    /// Cancels similarity computation.
    pub cancel: CancellationToken,
    /// Ignore the cache on read (results are still written back).
    pub force_recompute: bool,
}

impl Default for BuildOptions<'_> {
    fn default() -> Self {
        BuildOptions {
            observer: &LogProgress,
            cancel: CancellationToken::new(),
            force_recompute: false,
        }
    }
}

/// A built word graph together with the data it was built from.
#[derive(Debug, Clone)]
pub struct WordExplorer {
    vocabulary: Vocabulary,
    candidates: CandidateMap,
    graph: WordGraph,
    source: CandidateSource,
}

impl WordExplorer {
    /// Build with default options.
    pub fn build(
        vocabulary: &Vocabulary,
        cache: &dyn SimilarityCache,
        config: &ExplorerConfig,
    ) -> Result<Self> {
        Self::build_with(vocabulary, cache, config, BuildOptions::default())
    }

    /// Build from a vocabulary, consulting `cache` first.
    pub fn build_with(
        vocabulary: &Vocabulary,
        cache: &dyn SimilarityCache,
        config: &ExplorerConfig,
        options: BuildOptions<'_>,
    ) -> Result<Self> {
        config.validate()?;

        let vocabulary = vocabulary.filtered(&config.filter);
        if vocabulary.is_empty() {
            return Err(LexipathError::invalid_input(
                "vocabulary is empty after filtering",
            ));
        }
        let words = vocabulary.words();

        let cached = if options.force_recompute {
            None
        } else {
            read_cache(cache).filter(|candidates| {
                if !candidates.words().eq(words.iter().map(String::as_str)) {
                    log::warn!("Cached candidates do not match the vocabulary, recomputing");
                    return false;
                }
                if candidates.threshold() != Some(config.similarity.threshold) {
                    log::warn!(
                        "Cached candidates were scored with threshold {:?}, expected {}, recomputing",
                        candidates.threshold(),
                        config.similarity.threshold
                    );
                    return false;
                }
                true
            })
        };

        let (candidates, source) = match cached {
            Some(mut candidates) => {
                log::info!("Using cached similarity scores for {} words", candidates.len());
                if !candidates.is_sorted_descending() {
                    candidates.sort_descending();
                }
                (candidates, CandidateSource::Cache)
            }
            None => {
                log::info!("Computing similarity scores for {} words", words.len());
                let computer = SimilarityComputer::new(config.similarity.clone())?;
                let mut candidates =
                    computer.compute_with(&words, options.observer, &options.cancel)?;
                candidates.sort_descending();

                if let Err(e) = cache.put(&candidates) {
                    log::warn!("Failed to store similarity cache: {e}");
                }
                (candidates, CandidateSource::Computed)
            }
        };

        let graph = GraphBuilder::new(config.max_degree)
            .with_weighting(config.weighting)
            .build(&candidates)?;

        Ok(WordExplorer {
            vocabulary,
            candidates,
            graph,
            source,
        })
    }

    /// Build from the cache alone, without a vocabulary.
    ///
    /// Fails with `Cache` if nothing is stored.
    pub fn from_cache(cache: &dyn SimilarityCache, config: &ExplorerConfig) -> Result<Self> {
        let candidates = cache
            .get()?
            .ok_or_else(|| LexipathError::cache("no similarity cache found"))?;
        if let Some(stored) = candidates.threshold()
            && stored > config.similarity.threshold
        {
            log::warn!(
                "Cached candidates were scored with threshold {stored}, pairs between it and {} are missing",
                config.similarity.threshold
            );
        }
        let mut explorer = Self::from_candidates(candidates, config)?;
        explorer.source = CandidateSource::Cache;
        Ok(explorer)
    }

    /// Build from an existing candidate map, sorting it if needed.
    ///
    /// Candidates at or below the configured threshold are dropped first.
    pub fn from_candidates(mut candidates: CandidateMap, config: &ExplorerConfig) -> Result<Self> {
        config.validate()?;
        if candidates.is_empty() {
            return Err(LexipathError::invalid_input("candidate map is empty"));
        }

        let dropped = candidates.retain_above(config.similarity.threshold);
        if dropped > 0 {
            log::debug!(
                "Dropped {dropped} candidates at or below threshold {}",
                config.similarity.threshold
            );
        }
        if !candidates.is_sorted_descending() {
            candidates.sort_descending();
        }

        let graph = GraphBuilder::new(config.max_degree)
            .with_weighting(config.weighting)
            .build(&candidates)?;

        Ok(WordExplorer {
            vocabulary: Vocabulary::from_words(candidates.words()),
            candidates,
            graph,
            source: CandidateSource::Computed,
        })
    }

    /// The filtered vocabulary the graph was built over.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The sorted candidate lists.
    pub fn candidates(&self) -> &CandidateMap {
        &self.candidates
    }

    /// The graph.
    pub fn graph(&self) -> &WordGraph {
        &self.graph
    }

    /// Where the candidates came from.
    pub fn source(&self) -> CandidateSource {
        self.source
    }

    /// Shortest path between two words.
    pub fn find_path(&self, start: &str, end: &str) -> Result<PathResult> {
        self.graph.find_path(start, end)
    }

    /// The `limit` strongest candidates of a word, before degree capping.
    pub fn neighbors(&self, word: &str, limit: usize) -> Result<Vec<CandidateEdge>> {
        let list = self
            .candidates
            .get(word)
            .ok_or_else(|| LexipathError::unknown_word(word))?;
        Ok(list.iter().take(limit).cloned().collect())
    }

    /// Definition of a word, when the vocabulary carried one.
    pub fn definition(&self, word: &str) -> Option<&str> {
        self.vocabulary
            .definition(word)
            .filter(|definition| !definition.is_empty())
    }

    /// Graph statistics.
    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }
}

/// Read the cache, treating any failure as a miss.
fn read_cache(cache: &dyn SimilarityCache) -> Option<CandidateMap> {
    match cache.get() {
        Ok(candidates) => candidates,
        Err(e) => {
            log::warn!("Failed to load similarity cache, recomputing: {e}");
            None
        }
    }
}
