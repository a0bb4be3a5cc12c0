//! Koala main entry point
//!
//! This is the command-line interface for the privacy policy readability scorer.

use anyhow::Context;
use clap::Parser;
use koala::config::{load_config_or_default, load_config_with_hash};
use koala::crawler::{inspect_url, run_crawl};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Koala: privacy policy readability scorer
///
/// Fetches the privacy policies of top-ranked domains, scores how hard they
/// are to read, and writes one CSV row per domain.
#[derive(Parser, Debug)]
#[command(name = "koala")]
#[command(version)]
#[command(about = "Scores the readability of privacy policies", long_about = None)]
#[command(override_usage = "koala -s <TOPSITEFILE> -o <OUTPUTFILE>\n       koala -u <URL>")]
struct Cli {
    /// Top-sites CSV with Domain and GlobalRank columns
    #[arg(short = 's', long = "sfile", value_name = "TOPSITEFILE", required_unless_present = "url")]
    sfile: Option<PathBuf>,

    /// Report CSV to write (overwritten)
    #[arg(short = 'o', long = "ofile", value_name = "OUTPUTFILE", required_unless_present = "url")]
    ofile: Option<PathBuf>,

    /// Score a single page and print its text instead of running a crawl
    #[arg(short = 'u', long = "url", value_name = "URL", conflicts_with_all = ["sfile", "ofile"])]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short = 'c', long, value_name = "CONFIG", default_value = "koala.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage problems go to stdout; help and version exit 0, bad flags exit 2
            println!("{}", e.render());
            std::process::exit(e.exit_code());
        }
    };

    setup_logging(cli.verbose, cli.quiet);

    match (&cli.url, &cli.sfile, &cli.ofile) {
        (Some(url), _, _) => handle_inspect(&cli.config, url).await,
        (None, Some(sfile), Some(ofile)) => handle_crawl(&cli.config, sfile, ofile).await,
        _ => anyhow::bail!("either --url or both --sfile and --ofile are required"),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("koala=info,warn"),
            1 => EnvFilter::new("koala=debug,info"),
            _ => EnvFilter::new("koala=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --url mode: prints the extracted text and score of one page
async fn handle_inspect(config_path: &Path, url: &str) -> anyhow::Result<()> {
    let config = load_config_or_default(config_path)
        .with_context(|| format!("invalid configuration in {}", config_path.display()))?;

    match inspect_url(&config, url).await {
        Ok(inspection) => {
            println!("Text:\n{}", inspection.text);
            println!("Score: {:?}", inspection.score);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to score {}: {}", url, e);
            Err(e.into())
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config_path: &Path, sfile: &Path, ofile: &Path) -> anyhow::Result<()> {
    tracing::info!("Loading configuration from: {}", config_path.display());
    let config = match load_config_with_hash(config_path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Scoring domains ranked below {} (at most {} at once)",
        config.crawler.max_domain_rank,
        config.crawler.max_concurrent_domains
    );
    if config.crawler.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled");
    }

    match run_crawl(&config, sfile, ofile).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl completed: {} rows written to {}",
                summary.rows(),
                ofile.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
