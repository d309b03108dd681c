//! Vocabulary loading and filtering.
//!
//! A [`Vocabulary`] maps each word to its definition. Words are unique by text
//! and always iterated in sorted order, which gives the similarity computation
//! a deterministic input sequence.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LexipathError, Result};

/// Rules deciding which dictionary words enter the graph.
///
/// Longer words mean more vertices and quadratically more comparisons, so the
/// length window is the main knob for memory and compute time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordFilter {
    /// Minimum word length in characters (inclusive).
    pub min_len: usize,
    /// Maximum word length in characters (inclusive).
    pub max_len: usize,
    /// Reject words containing anything but alphabetic characters.
    pub letters_only: bool,
}

impl Default for WordFilter {
    fn default() -> Self {
        WordFilter {
            min_len: 3,
            max_len: 8,
            letters_only: true,
        }
    }
}

impl WordFilter {
    /// Check whether a word passes the filter.
    pub fn accepts(&self, word: &str) -> bool {
        let len = word.chars().count();
        if len < self.min_len || len > self.max_len {
            return false;
        }

        // Spaces and hyphens are rejected by the alphabetic check as well
        if self.letters_only && !word.chars().all(char::is_alphabetic) {
            return false;
        }

        true
    }
}

/// A set of unique words with their definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    entries: BTreeMap<String, String>,
}

impl Vocabulary {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Vocabulary {
            entries: BTreeMap::new(),
        }
    }

    /// Build a vocabulary from (word, definition) pairs. Later duplicates win.
    pub fn from_entries<I, W, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, D)>,
        W: Into<String>,
        D: Into<String>,
    {
        Vocabulary {
            entries: entries
                .into_iter()
                .map(|(w, d)| (w.into(), d.into()))
                .collect(),
        }
    }

    /// Build a vocabulary from bare words, with empty definitions.
    pub fn from_words<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self::from_entries(words.into_iter().map(|w| (w, String::new())))
    }

    /// Load a JSON dictionary of the form `{"word": "definition", ...}`.
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let entries: BTreeMap<String, String> = serde_json::from_str(&data).map_err(|e| {
            LexipathError::invalid_input(format!(
                "Failed to parse dictionary {}: {e}",
                path.display()
            ))
        })?;

        log::debug!("Loaded {} dictionary entries from {}", entries.len(), path.display());
        Ok(Vocabulary { entries })
    }

    /// Load a word list with one word per line. Blank lines are skipped.
    pub fn load_from_word_list<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut vocabulary = Vocabulary::new();

        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                vocabulary.insert(word.to_string(), String::new());
            }
        }

        Ok(vocabulary)
    }

    /// Insert or replace a word.
    pub fn insert(&mut self, word: String, definition: String) {
        self.entries.insert(word, definition);
    }

    /// Return a new vocabulary holding only the words accepted by `filter`.
    pub fn filtered(&self, filter: &WordFilter) -> Vocabulary {
        let entries: BTreeMap<String, String> = self
            .entries
            .iter()
            .filter(|(word, _)| filter.accepts(word))
            .map(|(w, d)| (w.clone(), d.clone()))
            .collect();

        log::debug!(
            "Word filter kept {} of {} words",
            entries.len(),
            self.entries.len()
        );
        Vocabulary { entries }
    }

    /// All words in sorted order.
    pub fn words(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Check if a word exists in the vocabulary.
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Get the definition of a word.
    pub fn definition(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = WordFilter::default();

        assert!(filter.accepts("cat"));
        assert!(filter.accepts("abstract"));
        assert!(filter.accepts("Zebra"));
        assert!(!filter.accepts("at"));
        assert!(!filter.accepts("abstracts"));
        assert!(!filter.accepts("ice cream"));
        assert!(!filter.accepts("x-ray"));
        assert!(!filter.accepts("abc123"));
    }

    #[test]
    fn test_filter_counts_chars_not_bytes() {
        let filter = WordFilter {
            min_len: 3,
            max_len: 4,
            letters_only: true,
        };

        // Four chars, five bytes
        assert!(filter.accepts("café"));
    }

    #[test]
    fn test_filter_without_letters_only() {
        let filter = WordFilter {
            letters_only: false,
            ..WordFilter::default()
        };
        assert!(filter.accepts("x-ray"));
    }

    #[test]
    fn test_filtered_vocabulary() {
        let vocabulary = Vocabulary::from_entries([
            ("cat", "a small feline"),
            ("at", "a preposition"),
            ("cart", "a wheeled vehicle"),
            ("half-way", "midway"),
        ]);

        let filtered = vocabulary.filtered(&WordFilter::default());
        assert_eq!(filtered.words(), vec!["cart".to_string(), "cat".to_string()]);
        assert_eq!(filtered.definition("cat"), Some("a small feline"));
        assert!(!filtered.contains("at"));
    }

    #[test]
    fn test_load_from_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"dog": "a canine", "dot": "a small mark"}}"#).unwrap();

        let vocabulary = Vocabulary::load_from_json(file.path()).unwrap();
        assert_eq!(vocabulary.len(), 2);
        assert_eq!(vocabulary.definition("dot"), Some("a small mark"));
    }

    #[test]
    fn test_load_from_json_rejects_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let result = Vocabulary::load_from_json(file.path());
        assert!(matches!(result, Err(LexipathError::InvalidInput(_))));
    }

    #[test]
    fn test_load_from_word_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cat\n\n  dog  \ncat").unwrap();

        let vocabulary = Vocabulary::load_from_word_list(file.path()).unwrap();
        assert_eq!(vocabulary.words(), vec!["cat".to_string(), "dog".to_string()]);
        assert_eq!(vocabulary.definition("dog"), Some(""));
    }
}
