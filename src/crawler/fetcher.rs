//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client (identity, timeout, redirects, TLS policy)
//! - GET requests for policy pages
//! - Error classification
//!
//! Failed requests are never retried.

use crate::config::CrawlerConfig;
use crate::FetchError;
use reqwest::header::ACCEPT;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Accept header sent with every policy request
pub const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Builds the HTTP client shared by every domain task
///
/// The client keeps one connection pool for the whole run. Each request gets
/// `request_timeout_secs` in total, redirects are followed automatically.
///
/// When `accept_invalid_certs` is set, TLS certificates are not verified.
/// This trades strictness for reach: many policy pages sit behind expired or
/// misconfigured certificates, and the content is only read, never trusted.
///
/// # Arguments
///
/// * `crawler` - Timeout and TLS settings
/// * `user_agent` - User-Agent header value
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &str,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(crawler.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body as text
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Non-2xx status after redirects | `HttpStatus` |
/// | DNS, connect, reset, timeout, redirect loop | `Transport` |
/// | URL cannot be turned into a request | `InvalidRequest` |
/// | Body cannot be decoded | `Body` |
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .header(ACCEPT, ACCEPT_HTML)
        .send()
        .await
        .map_err(|e| classify_send_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    tracing::debug!("Got response [{}] for URL: {}", status.as_u16(), url);

    response.text().await.map_err(|e| {
        if e.is_decode() {
            FetchError::Body {
                url: url.to_string(),
                source: e,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    })
}

/// Maps a failed send to the fetch error taxonomy
fn classify_send_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_builder() {
        FetchError::InvalidRequest {
            url: url.to_string(),
            source: e,
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: e,
        }
    }
}
