//! File-based similarity cache.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::SimilarityCache;
use crate::error::{LexipathError, Result};
use crate::similarity::CandidateMap;

/// Version of the on-disk layout. Files with another version are ignored.
pub const CACHE_FORMAT_VERSION: u32 = 2;

/// Default cache file location, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "cache/similarity_cache.bin";

/// Contents of a cache file, after the version header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// When the candidates were stored.
    pub created_at: DateTime<Utc>,
    /// Number of words in the candidate map.
    pub word_count: usize,
    /// The stored candidates.
    pub candidates: CandidateMap,
}

/// A [`SimilarityCache`] backed by a single bincode file.
///
/// The file starts with a `u32` format version followed by a
/// [`CacheSnapshot`]. Writes go to a temporary sibling that is renamed into
/// place, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct FileSimilarityCache {
    path: PathBuf,
}

impl FileSimilarityCache {
    /// Create a cache stored at `path`. Nothing is touched until first use.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileSimilarityCache {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the cache file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the full snapshot, including metadata.
    pub fn load_snapshot(&self) -> Result<Option<CacheSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);

        let version: u32 = bincode::deserialize_from(&mut reader).map_err(|e| {
            LexipathError::cache(format!(
                "Failed to read cache header from {}: {e}",
                self.path.display()
            ))
        })?;
        if version != CACHE_FORMAT_VERSION {
            log::warn!(
                "Ignoring cache {} with format version {version} (expected {CACHE_FORMAT_VERSION})",
                self.path.display()
            );
            return Ok(None);
        }

        let snapshot: CacheSnapshot = bincode::deserialize_from(&mut reader).map_err(|e| {
            LexipathError::cache(format!(
                "Failed to decode cache {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(Some(snapshot))
    }

    /// Delete the cache file if present.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for FileSimilarityCache {
    fn default() -> Self {
        FileSimilarityCache::new(DEFAULT_CACHE_PATH)
    }
}

impl SimilarityCache for FileSimilarityCache {
    fn get(&self) -> Result<Option<CandidateMap>> {
        Ok(self.load_snapshot()?.map(|snapshot| snapshot.candidates))
    }

    fn put(&self, candidates: &CandidateMap) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let snapshot = CacheSnapshot {
            created_at: Utc::now(),
            word_count: candidates.len(),
            candidates: candidates.clone(),
        };

        let temp_path = self.temp_path();
        let written = write_snapshot(&temp_path, &snapshot)
            .and_then(|()| fs::rename(&temp_path, &self.path).map_err(LexipathError::from));
        if let Err(e) = written {
            if temp_path.exists() {
                let _ = fs::remove_file(&temp_path);
            }
            return Err(e);
        }

        log::debug!(
            "Stored {} candidate lists in {}",
            snapshot.word_count,
            self.path.display()
        );
        Ok(())
    }
}

/// Write the version header and `snapshot` to `path`.
fn write_snapshot(path: &Path, snapshot: &CacheSnapshot) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, &CACHE_FORMAT_VERSION)?;
    bincode::serialize_into(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}
