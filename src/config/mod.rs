//! Configuration module for Koala
//!
//! This module handles loading, parsing, and validating the TOML configuration file.
//! The resulting [`Config`] is built once at startup and handed to the crawler.
//!
//! # Example
//!
//! ```no_run
//! use koala::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("koala.toml")).unwrap();
//! println!("Scoring domains ranked below {}", config.crawler.max_domain_rank);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, SourcesConfig, UserAgentConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_or_default, load_config_with_hash};
pub use validation::require_sources;
