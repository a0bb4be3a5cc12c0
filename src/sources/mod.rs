//! Input sources
//!
//! Loaders for the two tables a run starts from:
//! - the domain rank table (top-sites CSV)
//! - the domain to privacy-policy URL mapping (contacts and policy CSVs)
//!
//! Both are read once at startup and stay read-only for the rest of the run.

mod policies;
mod ranks;

pub use policies::{
    join_policy_records, load_policy_urls, read_policy_records, PolicyRecord, PolicyUrls,
};
pub use ranks::{load_rank_table, RankTable};

use crate::{SourceError, SourceResult};
use std::fs::File;
use std::path::Path;

fn open_csv(path: &Path) -> SourceResult<File> {
    File::open(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })
}
