//! Manga-Binder main entry point
//!
//! This is the command-line interface for the Manga-Binder downloader.

use anyhow::Context;
use clap::Parser;
use manga_binder::catalog::{choose, Catalog};
use manga_binder::config::{load_or_default, validate, Config};
use manga_binder::crawler::Coordinator;
use manga_binder::model::Publication;
use manga_binder::output::{print_report, ProgressDisplay};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exit status when no query is given
const EXIT_NO_QUERY: i32 = -1;

/// Exit status when the catalog has no match for the query
const EXIT_NOT_FOUND: i32 = -2;

/// Manga-Binder: search a catalog and bind a publication into PDFs
///
/// Manga-Binder searches the catalog for a title, discovers its volumes and
/// chapters, downloads every page image and writes one PDF per volume.
#[derive(Parser, Debug)]
#[command(name = "manga-binder")]
#[command(version)]
#[command(about = "Download a publication and bind one PDF per volume", long_about = None)]
struct Cli {
    /// Title (or part of it) to search the catalog for
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory receiving the volume documents
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Directory holding the per-run working storage
    #[arg(long, value_name = "DIR")]
    work_dir: Option<PathBuf>,

    /// Maximum number of pages fetched at the same time
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Keep downloaded page images after a successful run
    #[arg(long)]
    keep_work_dir: bool,

    /// Pick the first search result instead of prompting
    #[arg(short, long)]
    yes: bool,

    /// Show the discovered volumes and chapters without downloading
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let Some(query) = cli.query.clone() else {
        eprintln!("Usage: manga-binder <QUERY>");
        std::process::exit(EXIT_NO_QUERY);
    };

    let config = load_config(&cli)?;
    let coordinator = Coordinator::new(config.clone())?;

    let catalog = Catalog::new(coordinator.extractor().clone(), config.catalog.clone());
    let hits = catalog.search(&query).await?;
    if hits.is_empty() {
        eprintln!("Nothing found for {:?}", query);
        std::process::exit(EXIT_NOT_FOUND);
    }

    let Some(publication) = select(&hits, cli.yes)? else {
        tracing::warn!("No publication selected");
        return Ok(());
    };

    if cli.dry_run {
        return handle_dry_run(&coordinator, publication).await;
    }

    let coordinator = if cli.quiet {
        coordinator
    } else {
        coordinator.with_progress(ProgressDisplay::terminal())
    };

    // Returned errors are printed once, by the anyhow report
    let report = coordinator.run(publication).await?;

    print_report(&report);
    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("manga_binder=info,warn"),
            1 => EnvFilter::new("manga_binder=debug,info"),
            2 => EnvFilter::new("manga_binder=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // stdout belongs to the prompt, the progress bar and the report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (or defaults) and applies CLI overrides
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    if let Some(dir) = &cli.output_dir {
        config.download.output_dir = dir.clone();
    }
    if let Some(dir) = &cli.work_dir {
        config.download.work_dir = dir.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.download.max_concurrent_pages = concurrency;
    }
    if cli.keep_work_dir {
        config.download.keep_work_dir = true;
    }

    validate(&config).context("Invalid command-line override")?;
    tracing::debug!("Using configuration: {:?}", config);
    Ok(config)
}

/// Picks the publication to download, interactively unless `yes` is set
fn select(hits: &[Publication], yes: bool) -> anyhow::Result<Option<&Publication>> {
    if yes {
        return Ok(hits.first());
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Ok(choose(hits, stdin.lock(), stdout.lock())?)
}

/// Handles the --dry-run mode: shows the structure that would be downloaded
async fn handle_dry_run(coordinator: &Coordinator, publication: &Publication) -> anyhow::Result<()> {
    let structure = coordinator.discover(publication).await?;

    println!("=== Manga-Binder Dry Run ===\n");
    println!("Publication: {}", publication);
    println!("Volumes: {}", structure.volume_count());
    println!("Chapters: {}", structure.total_chapters());
    println!();

    for volume in structure.volumes() {
        println!("  Volume {} ({} chapters)", volume.index, volume.len());
        for chapter in &volume.chapters {
            println!("    {}: {}", chapter.index, chapter.location);
        }
    }

    Ok(())
}
