//! Output formatting for CLI commands.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cli::args::{LexipathArgs, OutputFormat};
use crate::error::Result;
use crate::explorer::CandidateSource;
use crate::graph::GraphStats;
use crate::similarity::progress::percentage;
use crate::similarity::{CandidateEdge, ProgressObserver};

/// Result structure for the compute command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComputeResult {
    pub word_count: usize,
    pub candidate_relations: usize,
    pub source: CandidateSource,
    pub cache_path: String,
    pub duration_ms: u64,
}

/// A word with its definition.
#[derive(Debug, Serialize, Deserialize)]
pub struct WordDefinition {
    pub word: String,
    pub definition: Option<String>,
}

/// Result structure for path queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathOutput {
    pub from: String,
    pub to: String,
    pub reachable: bool,
    pub path: Vec<String>,
    /// None when unreachable, since JSON has no infinity.
    pub cost: Option<f64>,
    pub hops: usize,
    pub weighting: String,
    pub definitions: Option<Vec<WordDefinition>>,
}

/// Result structure for candidate listings.
#[derive(Debug, Serialize, Deserialize)]
pub struct NeighborsOutput {
    pub word: String,
    pub neighbors: Vec<CandidateEdge>,
}

/// Result structure for graph statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsOutput {
    pub source: CandidateSource,
    pub weighting: String,
    pub stats: GraphStats,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self);
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &LexipathArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LexipathArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

impl HumanOutput for ComputeResult {
    fn print_human(&self) {
        let source = match self.source {
            CandidateSource::Cache => "loaded from cache",
            CandidateSource::Computed => "computed",
        };
        println!(
            "{} words, {} candidate relations ({source})",
            self.word_count, self.candidate_relations
        );
        println!("Cache: {}", self.cache_path);
        println!("Time: {}", format_duration(self.duration_ms));
    }
}

impl HumanOutput for PathOutput {
    fn print_human(&self) {
        if !self.reachable {
            println!("No path from '{}' to '{}'", self.from, self.to);
            return;
        }

        println!("path from '{}' -> '{}': {}", self.from, self.to, self.path.join(" -> "));
        if let Some(cost) = self.cost {
            println!("(cost: {cost:.4}, {} hops, {} weights)", self.hops, self.weighting);
        }

        if let Some(definitions) = &self.definitions {
            println!();
            for entry in definitions {
                match &entry.definition {
                    Some(definition) => println!("{}: {definition}", entry.word),
                    None => println!("{}: (no definition)", entry.word),
                }
            }
        }
    }
}

impl HumanOutput for NeighborsOutput {
    fn print_human(&self) {
        if self.neighbors.is_empty() {
            println!("{} -> []", self.word);
            return;
        }

        let formatted: Vec<String> = self
            .neighbors
            .iter()
            .map(|edge| format!("({}, {:.2})", edge.word, edge.score))
            .collect();
        println!("{} -> {}", self.word, formatted.join(" "));
    }
}

impl HumanOutput for StatsOutput {
    fn print_human(&self) {
        println!("Graph Statistics:");
        println!("═════════════════");
        println!("Vertices: {}", self.stats.vertex_count);
        println!("Edges: {}", self.stats.edge_count);
        println!(
            "Out-degree: max {} (bound {}), average {:.2}",
            self.stats.max_out_degree, self.stats.max_degree, self.stats.average_out_degree
        );
        println!("Isolated words: {}", self.stats.isolated_vertices);
        println!("One-way edges: {}", self.stats.asymmetric_edges);
        println!("Weighting: {}", self.weighting);
    }
}

/// Progress observer that redraws a percentage line on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\rProgress: {:.2}%", percentage(completed, total));
        let _ = stderr.flush();
    }

    fn on_complete(&self, total: usize) {
        eprintln!("\rProgress: 100.00% ({total} pairs)");
    }
}

/// Format milliseconds for display.
fn format_duration(ms: u64) -> String {
    if ms >= 60_000 {
        format!("{}m {:.1}s", ms / 60_000, (ms % 60_000) as f64 / 1000.0)
    } else if ms >= 1000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{ms}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(15), "15ms");
        assert_eq!(format_duration(1500), "1.50s");
        assert_eq!(format_duration(61_500), "1m 1.5s");
    }

    #[test]
    fn test_unreachable_path_serializes_null_cost() {
        let output = PathOutput {
            from: "cat".to_string(),
            to: "zebra".to_string(),
            reachable: false,
            path: Vec::new(),
            cost: None,
            hops: 0,
            weighting: "dissimilarity".to_string(),
            definitions: None,
        };

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["cost"], serde_json::Value::Null);
        assert_eq!(value["reachable"], serde_json::Value::Bool(false));
    }
}
