//! Configuration for building and querying word graphs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::file::DEFAULT_CACHE_PATH;
use crate::error::{LexipathError, Result};
use crate::graph::{DEFAULT_MAX_DEGREE, EdgeWeighting};
use crate::similarity::SimilarityConfig;
use crate::vocabulary::WordFilter;

/// Top-level configuration, loadable from a JSON file.
///
/// Missing fields take their default values, so a file only needs to name
/// the settings it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Which dictionary words become vertices.
    pub filter: WordFilter,

    /// Similarity scoring settings.
    pub similarity: SimilarityConfig,

    /// Maximum out-degree per vertex.
    pub max_degree: usize,

    /// How scores become edge weights.
    pub weighting: EdgeWeighting,

    /// Location of the similarity cache file.
    pub cache_path: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            filter: WordFilter::default(),
            similarity: SimilarityConfig::default(),
            max_degree: DEFAULT_MAX_DEGREE,
            weighting: EdgeWeighting::default(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let config: ExplorerConfig = serde_json::from_str(&data).map_err(|e| {
            LexipathError::config(format!("Failed to parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.filter.min_len > self.filter.max_len {
            return Err(LexipathError::config(format!(
                "word filter min_len ({}) exceeds max_len ({})",
                self.filter.min_len, self.filter.max_len
            )));
        }
        self.similarity.validate()
    }
}
