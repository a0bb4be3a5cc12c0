//! Koala: privacy policy readability scorer
//!
//! This crate fetches the privacy-policy pages of ranked domains, extracts their
//! visible text, scores the combined text for readability and writes one CSV row
//! per domain.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sources;
pub mod text;

use thiserror::Error;

/// Main error type for Koala operations
#[derive(Debug, Error)]
pub enum KoalaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input source error: {0}")]
    Source(#[from] SourceError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file not found: {0}")]
    MissingFile(String),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while fetching a single policy URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not build request for {url}: {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Returns true for ordinary network failures (bad status, DNS, resets).
    ///
    /// Anything else points at a bug or a malformed input and gets logged louder.
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            FetchError::HttpStatus { .. } | FetchError::Transport { .. }
        )
    }

    /// The URL the failed request targeted
    pub fn url(&self) -> &str {
        match self {
            FetchError::HttpStatus { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::InvalidRequest { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }
}

/// Errors raised while loading the rank table or policy URL lists
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Errors raised by the report writer
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Report writer lock poisoned")]
    Poisoned,
}

/// Result type alias for Koala operations
pub type Result<T> = std::result::Result<T, KoalaError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for input source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, DomainWorkItem, Score, ScoreResult};
pub use output::{CrawlSummary, ReportWriter};
pub use sources::{PolicyUrls, RankTable};
