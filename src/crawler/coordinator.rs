//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties a run together:
//! - Selecting the domains that pass the rank filter
//! - Spawning one task per selected domain, capped by a semaphore
//! - Sharing one HTTP client (and its connection pool) across tasks
//! - Writing each domain's row as soon as its task finishes
//!
//! Every selected domain produces exactly one row. Failures inside a domain
//! task end in a `-1` row rather than aborting the run.

use crate::config::{require_sources, Config, CrawlerConfig};
use crate::crawler::build_http_client;
use crate::crawler::processor::{process_domain, Score, ScoreResult};
use crate::output::{CrawlSummary, ReportWriter};
use crate::sources::{load_policy_urls, load_rank_table, PolicyUrls, RankTable};
use crate::KoalaError;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};

/// A domain scheduled for scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainWorkItem {
    pub domain: String,
    pub rank: u64,
    pub urls: Vec<String>,
}

/// Joins policy URLs with ranks and keeps domains ranked below `max_rank`
///
/// Domains missing from the rank table are dropped as well. Returns the work
/// items in policy-table order together with the number of skipped domains.
pub fn select_work(
    ranks: &RankTable,
    policy_urls: &PolicyUrls,
    max_rank: u64,
) -> (Vec<DomainWorkItem>, usize) {
    let mut work = Vec::new();
    let mut skipped = 0;

    for (domain, urls) in policy_urls.iter() {
        match ranks.get(domain) {
            Some(rank) if rank < max_rank => {
                tracing::info!("Scheduling work for {}", domain);
                work.push(DomainWorkItem {
                    domain: domain.to_string(),
                    rank,
                    urls: urls.to_vec(),
                });
            }
            Some(rank) => {
                tracing::info!("Skipping {}: rank {} is not below {}", domain, rank, max_rank);
                skipped += 1;
            }
            None => {
                tracing::info!("Skipping {}: not in rank table", domain);
                skipped += 1;
            }
        }
    }

    (work, skipped)
}

/// What a finished domain task reports back to the coordinator
#[derive(Debug)]
struct TaskOutcome {
    score: Score,
    panicked: bool,
    written: bool,
}

/// Aborts the wrapped task when dropped
///
/// Keeps a spawned processor tied to the domain task awaiting it: if that
/// task is cancelled, the processor stops too.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Client,
    settings: CrawlerConfig,
    writer: Arc<ReportWriter>,
}

impl Coordinator {
    /// Creates a coordinator and starts the report
    ///
    /// The report file at `output` is truncated and its header written here,
    /// before any domain is processed.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(KoalaError)` - HTTP client or report file could not be set up
    pub fn new(config: &Config, output: &Path) -> Result<Self, KoalaError> {
        let client = build_http_client(&config.crawler, &config.user_agent.value)?;
        let writer = ReportWriter::create(output)?;
        Ok(Self::with_client(client, config.crawler.clone(), writer))
    }

    /// Creates a coordinator around an existing client and report writer
    pub fn with_client(client: Client, settings: CrawlerConfig, writer: ReportWriter) -> Self {
        Self {
            client,
            settings,
            writer: Arc::new(writer),
        }
    }

    /// Scores every qualifying domain and waits for all of them
    ///
    /// This is the core crawling logic that:
    /// 1. Selects domains ranked below the configured threshold
    /// 2. Spawns one task per domain, at most `max_concurrent_domains` at once
    /// 3. Writes each result row as its task completes
    /// 4. Returns once every task has finished
    pub async fn run(&self, ranks: &RankTable, policy_urls: &PolicyUrls) -> CrawlSummary {
        let (work, skipped) = select_work(ranks, policy_urls, self.settings.max_domain_rank);

        let mut summary = CrawlSummary {
            scheduled: work.len(),
            skipped,
            ..Default::default()
        };

        tracing::info!(
            "Starting crawl: {} domains scheduled, {} skipped",
            summary.scheduled,
            summary.skipped
        );

        let limiter = Arc::new(Semaphore::new(self.settings.max_concurrent_domains as usize));
        let mut tasks = JoinSet::new();

        for item in work {
            let client = self.client.clone();
            let writer = Arc::clone(&self.writer);
            let limiter = Arc::clone(&limiter);

            tasks.spawn(async move {
                // The semaphore is never closed, so acquiring cannot fail
                let _permit = limiter.acquire_owned().await.ok();
                score_and_write(client, writer, item).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    if outcome.panicked {
                        summary.failed_tasks += 1;
                    }
                    if outcome.written {
                        summary.record(&outcome.score);
                    } else {
                        summary.write_errors += 1;
                    }
                }
                Err(e) => {
                    tracing::error!("Domain task failed: {}", e);
                    summary.failed_tasks += 1;
                    summary.write_errors += 1;
                }
            }
        }

        summary
    }

    pub fn writer(&self) -> &ReportWriter {
        &self.writer
    }
}

/// Runs the domain processor for one domain and appends its row
///
/// The processor runs as its own task so that a panic inside it is caught
/// here and turned into a sentinel row. Dropping this future aborts that task.
async fn score_and_write(
    client: Client,
    writer: Arc<ReportWriter>,
    item: DomainWorkItem,
) -> TaskOutcome {
    let DomainWorkItem { domain, rank, urls } = item;

    let mut processing = {
        let domain = domain.clone();
        let urls = urls.clone();
        AbortOnDrop(tokio::spawn(async move {
            process_domain(&client, &domain, rank, &urls).await
        }))
    };

    let (result, panicked) = match (&mut processing.0).await {
        Ok(result) => (result, false),
        Err(e) => {
            tracing::error!("Processing {} failed unexpectedly: {}", domain, e);
            (ScoreResult::unavailable(&domain, rank, &urls), true)
        }
    };

    let written = match writer.append_row(&result) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to write results for {}: {}", domain, e);
            false
        }
    };

    TaskOutcome {
        score: result.score,
        panicked,
        written,
    }
}

/// Runs a complete crawl from configuration and file paths
///
/// Loads the rank table and policy tables, writes the report header, then
/// scores every qualifying domain. All input and configuration errors surface
/// before the first request is sent.
///
/// # Arguments
///
/// * `config` - The run configuration; must include `[sources]`
/// * `rank_file` - Top-sites CSV with `Domain` and `GlobalRank` columns
/// * `output` - Report path, truncated at start
pub async fn run_crawl(
    config: &Config,
    rank_file: &Path,
    output: &Path,
) -> Result<CrawlSummary, KoalaError> {
    let sources = require_sources(config)?;

    let ranks = load_rank_table(rank_file)?;
    let policy_urls = load_policy_urls(Path::new(&sources.contacts), Path::new(&sources.policies))?;

    let coordinator = Coordinator::new(config, output)?;
    let summary = coordinator.run(&ranks, &policy_urls).await;
    summary.log();

    Ok(summary)
}
