//! Error types for the Lexipath library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`LexipathError`] enum. Unreachable path queries are not errors; they are
//! reported through [`crate::graph::PathResult::unreachable`].
//!
//! # Examples
//!
//! ```
//! use lexipath::error::{LexipathError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LexipathError::invalid_input("vocabulary is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lexipath operations.
#[derive(Error, Debug)]
pub enum LexipathError {
    /// I/O errors (dictionary files, cache files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or empty vocabulary, or invalid graph input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A word that is not a vertex of the graph.
    #[error("Unknown word: '{0}' is not in the graph")]
    UnknownWord(String),

    /// Similarity cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation cancelled
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal errors (thread pool construction and similar)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for operations that may fail with LexipathError.
pub type Result<T> = std::result::Result<T, LexipathError>;

impl LexipathError {
    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        LexipathError::InvalidInput(msg.into())
    }

    /// Create a new unknown word error.
    pub fn unknown_word<S: Into<String>>(word: S) -> Self {
        LexipathError::UnknownWord(word.into())
    }

    /// Create a new cache error.
    pub fn cache<S: Into<String>>(msg: S) -> Self {
        LexipathError::Cache(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LexipathError::Config(msg.into())
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        LexipathError::OperationCancelled(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        LexipathError::SerializationError(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        LexipathError::Internal(msg.into())
    }
}

impl From<bincode::Error> for LexipathError {
    fn from(err: bincode::Error) -> Self {
        LexipathError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = LexipathError::invalid_input("vocabulary is empty");
        assert_eq!(error.to_string(), "Invalid input: vocabulary is empty");

        let error = LexipathError::unknown_word("zzz");
        assert_eq!(error.to_string(), "Unknown word: 'zzz' is not in the graph");

        let error = LexipathError::cancelled("similarity computation");
        assert_eq!(
            error.to_string(),
            "Operation cancelled: similarity computation"
        );
    }

    #[test]
    fn test_decode_error_conversions() {
        let json_error = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(
            LexipathError::from(json_error),
            LexipathError::Json(_)
        ));

        let bincode_error = bincode::deserialize::<u32>(&[1u8]).unwrap_err();
        assert!(matches!(
            LexipathError::from(bincode_error),
            LexipathError::SerializationError(_)
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = LexipathError::from(io_error);

        match error {
            LexipathError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
