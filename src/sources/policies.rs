//! Domain to privacy-policy URL tables

use crate::sources::open_csv;
use crate::{SourceError, SourceResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use url::Url;

/// A validated (domain, policy URL) pair read from one of the input tables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyRecord {
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Privacy Policy", alias = "PrivacyPolicyURL")]
    pub url: String,
}

impl PolicyRecord {
    /// Checks the record at the input boundary
    ///
    /// Blank URLs are silently dropped. URLs that are not absolute http(s)
    /// addresses are dropped with a warning.
    fn validated(self, origin: &str) -> Option<Self> {
        let domain = self.domain.trim().to_string();
        let url = self.url.trim().to_string();

        if domain.is_empty() || url.is_empty() {
            return None;
        }

        match Url::parse(&url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {
                Some(PolicyRecord { domain, url })
            }
            Ok(parsed) => {
                tracing::warn!(
                    "Dropping policy URL for {} in {}: unsupported scheme '{}'",
                    domain,
                    origin,
                    parsed.scheme()
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Dropping policy URL '{}' for {} in {}: {}",
                    url,
                    domain,
                    origin,
                    e
                );
                None
            }
        }
    }
}

/// Candidate privacy-policy URLs per domain
///
/// Domains iterate in first-seen order and each domain's URLs are unique,
/// kept in the order they were first added.
#[derive(Debug, Clone, Default)]
pub struct PolicyUrls {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl PolicyUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `url` to `domain`'s list unless the exact string is already there
    pub fn add(&mut self, domain: &str, url: &str) {
        match self.index.get(domain) {
            Some(&position) => {
                let urls = &mut self.entries[position].1;
                if !urls.iter().any(|existing| existing == url) {
                    urls.push(url.to_string());
                }
            }
            None => {
                self.index.insert(domain.to_string(), self.entries.len());
                self.entries.push((domain.to_string(), vec![url.to_string()]));
            }
        }
    }

    /// Merges a batch of records, preserving their order
    pub fn extend<I: IntoIterator<Item = PolicyRecord>>(&mut self, records: I) {
        for record in records {
            self.add(&record.domain, &record.url);
        }
    }

    pub fn get(&self, domain: &str) -> Option<&[String]> {
        self.index
            .get(domain)
            .map(|&position| self.entries[position].1.as_slice())
    }

    /// Iterates over (domain, urls) in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(domain, urls)| (domain.as_str(), urls.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads and validates policy records from CSV data
pub fn read_policy_records<R: Read>(reader: R, origin: &str) -> SourceResult<Vec<PolicyRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);

    let mut records = Vec::new();
    for record in csv_reader.deserialize::<PolicyRecord>() {
        let record = record.map_err(|source| SourceError::Csv {
            path: origin.to_string(),
            source,
        })?;
        if let Some(record) = record.validated(origin) {
            records.push(record);
        }
    }

    Ok(records)
}

/// Joins the contacts table and the supplementary policy table by domain
///
/// Contacts come first, so their URLs lead each domain's list.
pub fn join_policy_records(
    contacts: Vec<PolicyRecord>,
    policies: Vec<PolicyRecord>,
) -> PolicyUrls {
    let mut urls = PolicyUrls::new();
    urls.extend(contacts);
    urls.extend(policies);
    urls
}

/// Loads both policy tables from disk and joins them
///
/// # Arguments
///
/// * `contacts` - Contacts table with `Domain` and `Privacy Policy` columns
/// * `policies` - Supplementary policy table with the same columns
pub fn load_policy_urls(contacts: &Path, policies: &Path) -> SourceResult<PolicyUrls> {
    tracing::info!("Loading policy tables...");
    let contact_records =
        read_policy_records(open_csv(contacts)?, &contacts.display().to_string())?;
    let policy_records =
        read_policy_records(open_csv(policies)?, &policies.display().to_string())?;

    let urls = join_policy_records(contact_records, policy_records);
    tracing::info!("Policy tables loaded: {} domains", urls.len());
    Ok(urls)
}
