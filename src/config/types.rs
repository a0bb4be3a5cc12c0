use serde::Deserialize;

/// Browser-like identity sent with every policy request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/35.0.1916.47 Safari/537.36";

/// Main configuration structure for Koala
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    /// Policy URL inputs; only required for a full crawl
    pub sources: Option<SourcesConfig>,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Domains are scored only when their rank is strictly below this value
    #[serde(rename = "max-domain-rank", default = "default_max_domain_rank")]
    pub max_domain_rank: u64,

    /// Maximum number of domains processed at the same time
    #[serde(
        rename = "max-concurrent-domains",
        default = "default_max_concurrent_domains"
    )]
    pub max_concurrent_domains: u32,

    /// Total time budget for a single request (seconds)
    #[serde(
        rename = "request-timeout-secs",
        default = "default_request_timeout_secs"
    )]
    pub request_timeout_secs: u64,

    /// Skip TLS certificate verification
    #[serde(rename = "accept-invalid-certs", default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_domain_rank: default_max_domain_rank(),
            max_concurrent_domains: default_max_concurrent_domains(),
            request_timeout_secs: default_request_timeout_secs(),
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

/// Locations of the domain to privacy-policy URL tables
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Contacts table (Domain, Privacy Policy)
    pub contacts: String,

    /// Supplementary policy table (Domain, Privacy Policy)
    pub policies: String,
}

fn default_max_domain_rank() -> u64 {
    1000
}

fn default_max_concurrent_domains() -> u32 {
    50
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_accept_invalid_certs() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
