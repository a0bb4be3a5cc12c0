//! Crawler module for policy fetching and scoring
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching with a shared client
//! - Per-domain processing (fetch, extract, combine, score)
//! - Overall crawl coordination and result writing

mod coordinator;
mod fetcher;
mod processor;

pub use coordinator::{run_crawl, select_work, Coordinator, DomainWorkItem};
pub use fetcher::{build_http_client, fetch_html, ACCEPT_HTML};
pub use processor::{
    collect_policy_text, collect_policy_text_with, process_domain, score_policy_text, Score,
    ScoreResult,
};

use crate::config::Config;
use crate::text::{extract_text, smog_index};
use crate::KoalaError;

/// Text and score for a single page, produced by [`inspect_url`]
#[derive(Debug, Clone)]
pub struct PageInspection {
    pub text: String,
    pub score: f64,
}

/// Fetches one URL and scores it on its own, outside of any crawl
///
/// Used to debug extraction and scoring for a specific page. Unlike a crawl,
/// fetch failures are returned to the caller.
pub async fn inspect_url(config: &Config, url: &str) -> Result<PageInspection, KoalaError> {
    let client = build_http_client(&config.crawler, &config.user_agent.value)?;
    let html = fetch_html(&client, url).await?;

    let text = extract_text(&html);
    let score = smog_index(&text);

    Ok(PageInspection { text, score })
}
