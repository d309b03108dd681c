//! # Lexipath
//!
//! Word-association graphs built from lexical similarity.
//!
//! Every pair of words in a vocabulary is scored with the normalized
//! Levenshtein similarity, in parallel. Each word then links to its strongest
//! candidates, up to a fixed out-degree, and shortest-path queries answer how
//! to get from one word to another through chains of similar words.
//!
//! ## Pipeline
//!
//! - [`vocabulary`]: load and filter a dictionary
//! - [`similarity`]: parallel all-pairs scoring
//! - [`cache`]: persist computed candidates
//! - [`graph`]: degree-capped directed graph and Dijkstra search
//! - [`explorer`]: the whole pipeline behind one type
//!
//! ```
//! use lexipath::cache::NoCache;
//! use lexipath::config::ExplorerConfig;
//! use lexipath::explorer::WordExplorer;
//! use lexipath::vocabulary::Vocabulary;
//!
//! let vocabulary = Vocabulary::from_words(["cat", "cot", "cog", "dog"]);
//! let explorer = WordExplorer::build(&vocabulary, &NoCache, &ExplorerConfig::default()).unwrap();
//!
//! let result = explorer.find_path("cat", "dog").unwrap();
//! assert_eq!(result.path.first().map(String::as_str), Some("cat"));
//! assert_eq!(result.path.last().map(String::as_str), Some("dog"));
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod explorer;
pub mod graph;
pub mod similarity;
pub mod util;
pub mod vocabulary;

pub mod prelude {
    pub use crate::cache::{FileSimilarityCache, MemorySimilarityCache, NoCache, SimilarityCache};
    pub use crate::config::ExplorerConfig;
    pub use crate::error::{LexipathError, Result};
    pub use crate::explorer::WordExplorer;
    pub use crate::graph::{EdgeWeighting, GraphBuilder, PathFinder, PathResult, WordGraph};
    pub use crate::similarity::{CandidateEdge, CandidateMap, SimilarityComputer, SimilarityConfig};
    pub use crate::vocabulary::{Vocabulary, WordFilter};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
