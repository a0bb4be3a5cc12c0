//! Per-domain processing
//!
//! Fetches every candidate policy URL of one domain in order, joins the
//! extracted text and scores it. Per-URL failures are logged and skipped, so
//! processing a domain always yields a [`ScoreResult`].

use crate::crawler::fetcher::fetch_html;
use crate::text::{extract_text, smog_index};
use reqwest::Client;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// The readability outcome for one domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// SMOG grade of the combined policy text
    Readability(f64),

    /// No policy text could be retrieved; reported as `-1`
    Unavailable,
}

impl Score {
    /// Numeric form used in the report (`-1` for unavailable)
    pub fn value(&self) -> f64 {
        match self {
            Score::Readability(score) => *score,
            Score::Unavailable => -1.0,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Score::Unavailable)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Debug keeps the decimal point on whole grades (12.0, not 12)
            Score::Readability(score) => write!(f, "{:?}", score),
            Score::Unavailable => write!(f, "-1"),
        }
    }
}

/// Result of processing one domain, ready to be written as a report row
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub domain: String,
    pub rank: u64,
    pub score: Score,
    pub urls: Vec<String>,
}

impl ScoreResult {
    /// A result for a domain whose policy text could not be obtained
    pub fn unavailable(domain: &str, rank: u64, urls: &[String]) -> Self {
        Self {
            domain: domain.to_string(),
            rank,
            score: Score::Unavailable,
            urls: urls.to_vec(),
        }
    }

    /// URLs in report form, joined with `;`
    pub fn joined_urls(&self) -> String {
        self.urls.join(";")
    }
}

/// Processes one domain: fetch each URL in order, extract, combine and score
///
/// URLs are fetched one after another, never concurrently. A URL that fails
/// does not stop the remaining ones.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `domain` - Domain being scored
/// * `rank` - Its popularity rank, carried into the result
/// * `urls` - Candidate policy URLs, in priority order
pub async fn process_domain(
    client: &Client,
    domain: &str,
    rank: u64,
    urls: &[String],
) -> ScoreResult {
    let text = collect_policy_text(client, urls).await;
    let score = score_policy_text(&text, urls);

    ScoreResult {
        domain: domain.to_string(),
        rank,
        score,
        urls: urls.to_vec(),
    }
}

/// Fetches and extracts every URL, joining the non-empty texts with newlines
pub async fn collect_policy_text(client: &Client, urls: &[String]) -> String {
    collect_policy_text_with(client, urls, extract_text).await
}

/// Like [`collect_policy_text`], with the HTML-to-text step supplied by the caller
///
/// A panic inside `extract` only loses the page being extracted: it is logged
/// and the remaining URLs are still fetched.
pub async fn collect_policy_text_with<F>(client: &Client, urls: &[String], extract: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut parts: Vec<String> = Vec::with_capacity(urls.len());

    for url in urls {
        match fetch_html(client, url).await {
            Ok(html) => match panic::catch_unwind(AssertUnwindSafe(|| extract(&html))) {
                Ok(text) if text.is_empty() => {
                    tracing::debug!("No visible text at {}", url);
                }
                Ok(text) => parts.push(text),
                Err(payload) => {
                    tracing::error!(
                        "Text extraction panicked for {}: {}",
                        url,
                        panic_message(payload.as_ref())
                    );
                }
            },
            Err(e) if e.is_network_failure() => {
                tracing::warn!("Fetch failed for {}: {}", e.url(), e);
            }
            Err(e) => {
                tracing::error!("Unexpected failure while fetching {}: {:?}", e.url(), e);
            }
        }
    }

    parts.join("\n")
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Scores combined policy text
///
/// Empty text means nothing was retrieved and yields [`Score::Unavailable`].
/// A grade of exactly zero is logged together with the URLs and text.
pub fn score_policy_text(text: &str, urls: &[String]) -> Score {
    if text.is_empty() {
        return Score::Unavailable;
    }

    let score = smog_index(text);
    if score == 0.0 {
        tracing::warn!("Score 0.0 for URLs {:?}\n***{}***", urls, text);
    }

    Score::Readability(score)
}
