//! Command line argument parsing for the Lexipath CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::graph::EdgeWeighting;

/// Lexipath - walk from one word to another through similar words
#[derive(Parser, Debug, Clone)]
#[command(name = "lexipath")]
#[command(about = "Build word-similarity graphs and find paths between words")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LexipathArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "LEXIPATH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LexipathArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute similarity scores and store them in the cache
    Compute(ComputeArgs),

    /// Find the shortest path between two words
    Path(PathArgs),

    /// Show the strongest similarity candidates of a word
    Neighbors(NeighborsArgs),

    /// Show graph statistics
    Stats(StatsArgs),
}

/// Where words and cached scores come from.
///
/// Without a dictionary or word list, the graph is built from the cache alone.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Dictionary file (JSON object of word to definition)
    #[arg(short, long, value_name = "DICTIONARY_FILE")]
    pub dictionary: Option<PathBuf>,

    /// Word list file (one word per line)
    #[arg(long, value_name = "WORD_LIST_FILE", conflicts_with = "dictionary")]
    pub word_list: Option<PathBuf>,

    /// Similarity cache file
    #[arg(long, value_name = "CACHE_FILE")]
    pub cache: Option<PathBuf>,

    /// Minimum word length
    #[arg(long)]
    pub min_len: Option<usize>,

    /// Maximum word length
    #[arg(long)]
    pub max_len: Option<usize>,
}

impl SourceArgs {
    /// Whether a vocabulary file was given.
    pub fn has_vocabulary(&self) -> bool {
        self.dictionary.is_some() || self.word_list.is_some()
    }
}

/// Arguments for computing similarity scores
#[derive(Parser, Debug, Clone)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of threads to use
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Recompute even if the cache is valid
    #[arg(long)]
    pub force: bool,
}

/// Arguments for path queries
#[derive(Parser, Debug, Clone)]
pub struct PathArgs {
    /// Start word
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Destination word
    #[arg(value_name = "TO")]
    pub to: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum out-degree per word
    #[arg(short = 'k', long)]
    pub max_degree: Option<usize>,

    /// How similarity scores become edge weights
    #[arg(short, long)]
    pub weighting: Option<WeightingArg>,

    /// Print definitions of the words along the path
    #[arg(long)]
    pub definitions: bool,
}

/// Arguments for listing candidates
#[derive(Parser, Debug, Clone)]
pub struct NeighborsArgs {
    /// Word to inspect
    #[arg(value_name = "WORD")]
    pub word: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum number of candidates to show
    #[arg(short, long, default_value = "15")]
    pub limit: usize,
}

/// Arguments for graph statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum out-degree per word
    #[arg(short = 'k', long)]
    pub max_degree: Option<usize>,

    /// How similarity scores become edge weights
    #[arg(short, long)]
    pub weighting: Option<WeightingArg>,
}

/// Edge weighting modes available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightingArg {
    /// Weight = 1 - similarity; shortest paths follow the most similar words
    Dissimilarity,
    /// Weight = similarity
    Similarity,
}

impl From<WeightingArg> for EdgeWeighting {
    fn from(arg: WeightingArg) -> Self {
        match arg {
            WeightingArg::Dissimilarity => EdgeWeighting::Dissimilarity,
            WeightingArg::Similarity => EdgeWeighting::Similarity,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
