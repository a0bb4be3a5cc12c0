//! Top-sites rank table loading

use crate::sources::open_csv;
use crate::{SourceError, SourceResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Domain popularity lookup; lower ranks are more popular
#[derive(Debug, Clone, Default)]
pub struct RankTable {
    ranks: HashMap<String, u64>,
}

/// One row of the top-sites file; other columns are ignored
#[derive(Debug, Deserialize)]
struct RankRecord {
    #[serde(rename = "Domain")]
    domain: String,
    #[serde(rename = "GlobalRank")]
    global_rank: String,
}

impl RankTable {
    /// Creates an empty rank table
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rank for `domain`, replacing any earlier one
    pub fn insert(&mut self, domain: impl Into<String>, rank: u64) {
        self.ranks.insert(domain.into(), rank);
    }

    /// Looks up the rank of `domain`
    pub fn get(&self, domain: &str) -> Option<u64> {
        self.ranks.get(domain).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Reads a rank table from CSV data with `Domain` and `GlobalRank` columns
    ///
    /// Rows whose rank is not an unsigned integer are skipped with a warning.
    /// When a domain appears twice, its last rank wins.
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> SourceResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = RankTable::new();
        for record in csv_reader.deserialize::<RankRecord>() {
            let record = record.map_err(|source| SourceError::Csv {
                path: origin.to_string(),
                source,
            })?;

            match record.global_rank.parse::<u64>() {
                Ok(rank) => table.insert(record.domain, rank),
                Err(_) => tracing::warn!(
                    "Skipping {} in {}: rank '{}' is not a number",
                    record.domain,
                    origin,
                    record.global_rank
                ),
            }
        }

        Ok(table)
    }
}

impl FromIterator<(String, u64)> for RankTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut table = RankTable::new();
        for (domain, rank) in iter {
            table.insert(domain, rank);
        }
        table
    }
}

/// Loads the top-sites CSV file into memory
///
/// # Arguments
///
/// * `path` - CSV file with at least `Domain` and `GlobalRank` columns
///
/// # Returns
///
/// * `Ok(RankTable)` - Every parseable row, keyed by domain
/// * `Err(SourceError)` - File could not be opened or is not valid CSV
pub fn load_rank_table(path: &Path) -> SourceResult<RankTable> {
    tracing::info!("Loading top sites from {}", path.display());
    let file = open_csv(path)?;
    let table = RankTable::from_reader(file, &path.display().to_string())?;
    tracing::info!("Top sites loaded: {} domains", table.len());
    Ok(table)
}
