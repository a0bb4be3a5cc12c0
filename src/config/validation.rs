use crate::config::types::{Config, CrawlerConfig, SourcesConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    if let Some(sources) = &config.sources {
        validate_sources_config(sources)?;
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_domain_rank < 1 {
        return Err(ConfigError::Validation(format!(
            "max_domain_rank must be >= 1, got {}",
            config.max_domain_rank
        )));
    }

    if config.max_concurrent_domains < 1 || config.max_concurrent_domains > 1000 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_domains must be between 1 and 1000, got {}",
            config.max_concurrent_domains
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Header values cannot carry line breaks
    if config.value.contains(['\r', '\n']) {
        return Err(ConfigError::Validation(
            "user agent must be a single line".to_string(),
        ));
    }

    Ok(())
}

/// Validates the input source paths
fn validate_sources_config(config: &SourcesConfig) -> Result<(), ConfigError> {
    if config.contacts.is_empty() {
        return Err(ConfigError::Validation(
            "sources.contacts cannot be empty".to_string(),
        ));
    }

    if config.policies.is_empty() {
        return Err(ConfigError::Validation(
            "sources.policies cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Returns the sources section, failing when a crawl is requested without one
pub fn require_sources(config: &Config) -> Result<&SourcesConfig, ConfigError> {
    config.sources.as_ref().ok_or_else(|| {
        ConfigError::Validation("a [sources] section is required to run a crawl".to_string())
    })
}
