//! Command implementations for the Lexipath CLI.

use std::time::Instant;

use crate::cache::FileSimilarityCache;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ExplorerConfig;
use crate::error::{LexipathError, Result};
use crate::explorer::{BuildOptions, WordExplorer};
use crate::similarity::{CancellationToken, NoopProgress, ProgressObserver};
use crate::vocabulary::Vocabulary;

/// Execute a CLI command.
pub fn execute_command(args: LexipathArgs) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Compute(compute_args) => compute(compute_args, config, &args),
        Command::Path(path_args) => find_path(path_args, config, &args),
        Command::Neighbors(neighbors_args) => show_neighbors(neighbors_args, config, &args),
        Command::Stats(stats_args) => show_stats(stats_args, config, &args),
    }
}

/// Load the configuration file, or the defaults.
fn load_config(args: &LexipathArgs) -> Result<ExplorerConfig> {
    match &args.config {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            ExplorerConfig::load_from_file(path)
        }
        None => Ok(ExplorerConfig::default()),
    }
}

/// Apply source flags on top of the configuration.
fn apply_source_overrides(config: &mut ExplorerConfig, source: &SourceArgs) -> Result<()> {
    if let Some(cache) = &source.cache {
        config.cache_path = cache.clone();
    }
    if let Some(min_len) = source.min_len {
        config.filter.min_len = min_len;
    }
    if let Some(max_len) = source.max_len {
        config.filter.max_len = max_len;
    }
    config.validate()
}

/// Load the vocabulary named by the source flags, if any.
fn load_vocabulary(source: &SourceArgs) -> Result<Option<Vocabulary>> {
    if let Some(path) = &source.dictionary {
        return Vocabulary::load_from_json(path).map(Some);
    }
    if let Some(path) = &source.word_list {
        return Vocabulary::load_from_word_list(path).map(Some);
    }
    Ok(None)
}

/// Build an explorer from a vocabulary, or from the cache alone.
fn open_explorer(
    source: &SourceArgs,
    config: &ExplorerConfig,
    force_recompute: bool,
    cli_args: &LexipathArgs,
) -> Result<WordExplorer> {
    let cache = FileSimilarityCache::new(&config.cache_path);

    match load_vocabulary(source)? {
        Some(vocabulary) => {
            let console = ConsoleProgress;
            let observer: &dyn ProgressObserver =
                if cli_args.verbosity() > 0 && matches!(cli_args.output_format, OutputFormat::Human)
                {
                    &console
                } else {
                    &NoopProgress
                };

            let options = BuildOptions {
                observer,
                cancel: CancellationToken::new(),
                force_recompute,
            };
            WordExplorer::build_with(&vocabulary, &cache, config, options)
        }
        None => WordExplorer::from_cache(&cache, config).map_err(|e| match e {
            LexipathError::Cache(msg) => LexipathError::invalid_input(format!(
                "{msg} at {}; pass --dictionary or --word-list to compute it",
                config.cache_path.display()
            )),
            other => other,
        }),
    }
}

/// Compute similarity scores and store them in the cache.
fn compute(args: &ComputeArgs, mut config: ExplorerConfig, cli_args: &LexipathArgs) -> Result<()> {
    apply_source_overrides(&mut config, &args.source)?;
    if let Some(threads) = args.threads {
        config.similarity.thread_pool_size = Some(threads);
        config.validate()?;
    }
    if !args.source.has_vocabulary() {
        return Err(LexipathError::invalid_input(
            "compute needs --dictionary or --word-list",
        ));
    }

    let start_time = Instant::now();
    let explorer = open_explorer(&args.source, &config, args.force, cli_args)?;

    output_result(
        "Similarity scores ready",
        &ComputeResult {
            word_count: explorer.candidates().len(),
            candidate_relations: explorer.candidates().entry_count() / 2,
            source: explorer.source(),
            cache_path: config.cache_path.to_string_lossy().to_string(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Find the shortest path between two words.
fn find_path(args: &PathArgs, mut config: ExplorerConfig, cli_args: &LexipathArgs) -> Result<()> {
    apply_source_overrides(&mut config, &args.source)?;
    if let Some(max_degree) = args.max_degree {
        config.max_degree = max_degree;
    }
    if let Some(weighting) = args.weighting {
        config.weighting = weighting.into();
    }

    let explorer = open_explorer(&args.source, &config, false, cli_args)?;
    let result = explorer.find_path(&args.from, &args.to)?;

    let definitions = args.definitions.then(|| {
        result
            .path
            .iter()
            .map(|word| WordDefinition {
                word: word.clone(),
                definition: explorer.definition(word).map(str::to_string),
            })
            .collect()
    });

    output_result(
        "Path query complete",
        &PathOutput {
            from: args.from.clone(),
            to: args.to.clone(),
            reachable: result.is_reachable(),
            hops: result.hops(),
            cost: result.is_reachable().then_some(result.cost),
            path: result.path,
            weighting: config.weighting.name().to_string(),
            definitions,
        },
        cli_args,
    )
}

/// Show the strongest candidates of a word.
fn show_neighbors(
    args: &NeighborsArgs,
    mut config: ExplorerConfig,
    cli_args: &LexipathArgs,
) -> Result<()> {
    apply_source_overrides(&mut config, &args.source)?;

    let explorer = open_explorer(&args.source, &config, false, cli_args)?;
    let neighbors = explorer.neighbors(&args.word, args.limit)?;

    output_result(
        "Candidates",
        &NeighborsOutput {
            word: args.word.clone(),
            neighbors,
        },
        cli_args,
    )
}

/// Show graph statistics.
fn show_stats(args: &StatsArgs, mut config: ExplorerConfig, cli_args: &LexipathArgs) -> Result<()> {
    apply_source_overrides(&mut config, &args.source)?;
    if let Some(max_degree) = args.max_degree {
        config.max_degree = max_degree;
    }
    if let Some(weighting) = args.weighting {
        config.weighting = weighting.into();
    }

    let explorer = open_explorer(&args.source, &config, false, cli_args)?;

    output_result(
        "Graph statistics",
        &StatsOutput {
            source: explorer.source(),
            weighting: config.weighting.name().to_string(),
            stats: explorer.stats(),
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::cache::SimilarityCache;

    fn write_dictionary(dir: &TempDir) -> String {
        let path = dir.path().join("dictionary.json");
        fs::write(
            &path,
            r#"{"cat": "a feline", "cot": "a bed", "cog": "a gear", "dog": "a canine"}"#,
        )
        .unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_compute_then_query_from_cache() {
        let dir = TempDir::new().unwrap();
        let dictionary = write_dictionary(&dir);
        let cache = dir.path().join("cache.bin").to_string_lossy().to_string();

        let args = LexipathArgs::try_parse_from([
            "lexipath", "-q", "-f", "json", "compute", "-d", &dictionary, "--cache", &cache,
            "--threads", "2",
        ])
        .unwrap();
        execute_command(args).unwrap();

        let stored = FileSimilarityCache::new(&cache).get().unwrap().unwrap();
        assert_eq!(stored.len(), 4);

        // No dictionary: the graph comes from the cache
        let args = LexipathArgs::try_parse_from([
            "lexipath", "-q", "-f", "json", "path", "cat", "dog", "--cache", &cache,
        ])
        .unwrap();
        execute_command(args).unwrap();
    }

    #[test]
    fn test_unknown_word_is_reported() {
        let dir = TempDir::new().unwrap();
        let dictionary = write_dictionary(&dir);
        let cache = dir.path().join("cache.bin").to_string_lossy().to_string();

        let args = LexipathArgs::try_parse_from([
            "lexipath", "-q", "-f", "json", "path", "cat", "unicorn", "-d", &dictionary,
            "--cache", &cache,
        ])
        .unwrap();

        assert!(matches!(
            execute_command(args),
            Err(LexipathError::UnknownWord(word)) if word == "unicorn"
        ));
    }

    #[test]
    fn test_missing_cache_without_vocabulary() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("absent.bin").to_string_lossy().to_string();

        let args =
            LexipathArgs::try_parse_from(["lexipath", "-q", "stats", "--cache", &cache]).unwrap();
        assert!(matches!(
            execute_command(args),
            Err(LexipathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_compute_requires_vocabulary() {
        let args = LexipathArgs::try_parse_from(["lexipath", "-q", "compute"]).unwrap();
        assert!(matches!(
            execute_command(args),
            Err(LexipathError::InvalidInput(_))
        ));
    }
}
