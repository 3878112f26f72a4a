//! Corpus-Harvest main entry point
//!
//! This is the command-line interface for the Corpus-Harvest corpus builder.

use clap::{Parser, Subcommand};
use corpus_harvest::config::{load_config_with_hash, Config};
use corpus_harvest::crawler::{acquire, FailurePolicy};
use corpus_harvest::output::{print_statistics, DatasetStatistics};
use corpus_harvest::pipeline::{
    ensure_separate_output, Analyzer, AnnotationPipeline, CommandAnalyzer, MergedCorpus,
    TokenAnalyzer,
};
use corpus_harvest::storage::naming;
use corpus_harvest::{CorpusManager, FileStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Corpus-Harvest: a small, reproducible news corpus builder
///
/// Corpus-Harvest collects article links from configured seed pages, stores
/// each article as a numbered record, and annotates the resulting dataset
/// with a pluggable linguistic analyzer.
#[derive(Parser, Debug)]
#[command(name = "corpus-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A small, reproducible news corpus builder", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the seed pages and build a fresh dataset
    Scrape {
        /// Path to the JSON or TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Dataset directory (wiped before the run)
        #[arg(short, long, default_value = "tmp/articles")]
        output: PathBuf,

        /// Skip articles that fail to extract instead of aborting
        #[arg(long)]
        skip_failed: bool,

        /// Validate config and show what would be crawled without crawling
        #[arg(long)]
        dry_run: bool,
    },

    /// Annotate every article of an existing dataset
    Annotate {
        /// Dataset directory
        #[arg(value_name = "DIR")]
        dataset: PathBuf,

        /// External analyzer program and its arguments (default: built-in tokenizer)
        #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "PROGRAM")]
        analyzer_cmd: Vec<String>,
    },

    /// Merge prefix-matched text files and annotate them as one document
    Merge {
        /// Directory holding the text files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// File stem prefix selecting the files to merge
        #[arg(long)]
        prefix: String,

        /// Directory receiving the merged annotation (wiped before the run)
        #[arg(short, long)]
        output: PathBuf,

        /// External analyzer program and its arguments (default: built-in tokenizer)
        #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "PROGRAM")]
        analyzer_cmd: Vec<String>,
    },

    /// Show statistics for an existing dataset
    Stats {
        /// Dataset directory
        #[arg(value_name = "DIR")]
        dataset: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Scrape {
            config,
            output,
            skip_failed,
            dry_run,
        } => handle_scrape(&config, &output, skip_failed, dry_run).await,
        Command::Annotate {
            dataset,
            analyzer_cmd,
        } => handle_annotate(&dataset, &analyzer_cmd),
        Command::Merge {
            input,
            prefix,
            output,
            analyzer_cmd,
        } => handle_merge(&input, &prefix, &output, &analyzer_cmd),
        Command::Stats { dataset } => handle_stats(&dataset),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("corpus_harvest=info,warn"),
            1 => EnvFilter::new("corpus_harvest=debug,info"),
            2 => EnvFilter::new("corpus_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Picks the external analyzer when a command was given, the built-in one otherwise
fn select_analyzer(analyzer_cmd: &[String]) -> Box<dyn Analyzer> {
    match analyzer_cmd.split_first() {
        Some((program, args)) => Box::new(CommandAnalyzer::new(program.clone(), args.to_vec())),
        None => Box::new(TokenAnalyzer::new()),
    }
}

/// Handles the `scrape` command: loads config, then crawls or dry-runs
async fn handle_scrape(
    config_path: &Path,
    output: &Path,
    skip_failed: bool,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading configuration from: {}", config_path.display());
    let config = match load_config_with_hash(config_path) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if dry_run {
        print_dry_run(&config, output);
        return Ok(());
    }

    let policy = if skip_failed {
        FailurePolicy::SkipAndRenumber
    } else {
        FailurePolicy::Abort
    };

    tracing::info!(
        "Collecting {} articles from {} seed pages into {}",
        config.article_quota(),
        config.seed_urls().len(),
        output.display()
    );

    match acquire(&config, output, policy).await {
        Ok(report) => {
            println!("✓ Stored {} articles in {}", report.stored, output.display());
            if !report.skipped.is_empty() {
                println!("  Skipped {} articles:", report.skipped.len());
                for url in &report.skipped {
                    println!("  - {}", url);
                }
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Acquisition failed: {}", e);
            Err(e.into())
        }
    }
}

/// Prints what a scrape run would do
fn print_dry_run(config: &Config, output: &Path) {
    println!("=== Corpus-Harvest Dry Run ===\n");

    println!("Acquisition:");
    println!("  Articles to collect: {}", config.article_quota());
    println!("  Output directory: {}", output.display());

    println!("\nTransport:");
    println!("  Encoding: {}", config.encoding_label());
    match config.timeout() {
        Some(timeout) => println!("  Timeout: {}s", timeout.as_secs()),
        None => println!("  Timeout: none"),
    }
    println!("  Verify TLS: {}", config.verify_tls());
    println!("  Headless mode: {}", config.headless_mode());

    println!("\nHeaders ({}):", config.headers().len());
    for (name, value) in config.headers() {
        println!("  {}: {}", name, value);
    }

    println!("\nSeed URLs ({}):", config.seed_urls().len());
    for seed in config.seed_urls() {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would collect up to {} articles from {} seed pages",
        config.article_quota(),
        config.seed_urls().len()
    );
}

/// Handles the `annotate` command: validates the dataset and annotates it
fn handle_annotate(
    dataset: &Path,
    analyzer_cmd: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut corpus = match CorpusManager::load(dataset) {
        Ok(corpus) => corpus,
        Err(e) => {
            tracing::error!("Dataset validation failed: {}", e);
            return Err(e.into());
        }
    };

    let store = FileStore::new(dataset);
    let analyzer = select_analyzer(analyzer_cmd);

    let report = AnnotationPipeline::new(&mut corpus, &store, analyzer.as_ref()).run()?;

    println!(
        "✓ Annotated {} of {} articles in {}",
        report.annotated,
        report.articles,
        dataset.display()
    );
    if !report.unaligned.is_empty() {
        println!("  Left without annotation: {:?}", report.unaligned);
    }

    Ok(())
}

/// Handles the `merge` command: merges the files and annotates the result
fn handle_merge(
    input: &Path,
    prefix: &str,
    output: &Path,
    analyzer_cmd: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_separate_output(input, output)?;
    let merged = MergedCorpus::combine(input, prefix)?;

    let merged_path = input.join(naming::MERGED_TEXT);
    merged.save(&merged_path)?;
    tracing::info!("Merged text written to {}", merged_path.display());

    let store = FileStore::prepare(output)?;
    let analyzer = select_analyzer(analyzer_cmd);
    merged.annotate(analyzer.as_ref(), &store)?;

    println!(
        "✓ Annotated {} merged files into {}",
        merged.sources().len(),
        output.join(naming::MERGED_ANNOTATION).display()
    );

    Ok(())
}

/// Handles the `stats` command: shows statistics for a dataset
fn handle_stats(dataset: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Dataset: {}\n", dataset.display());

    let corpus = CorpusManager::load(dataset)?;
    let stats = DatasetStatistics::from_corpus(&corpus);
    print_statistics(&stats);

    Ok(())
}
