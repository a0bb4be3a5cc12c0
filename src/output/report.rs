//! CSV report writer
//!
//! The report starts with a fixed header and gains one row per domain:
//!
//! ```text
//! domain,majestic_rank,redability_score,urls
//! a.com,5,11.2,https://a.com/privacy;https://a.com/legal
//! b.com,17,-1,https://b.com/privacy
//! ```
//!
//! Rows are appended as domains finish, so their order follows completion,
//! not input order. Every row is flushed before the call returns; a crashed
//! run leaves all rows written so far intact.

use crate::crawler::ScoreResult;
use crate::ReportError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Column names of the report, in order
pub const REPORT_HEADER: [&str; 4] = ["domain", "majestic_rank", "redability_score", "urls"];

/// Append-only report writer, safe to share between tasks
///
/// Appends take an internal lock, so concurrent callers never interleave
/// their rows.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    inner: Mutex<WriterState>,
}

#[derive(Debug)]
struct WriterState {
    writer: csv::Writer<File>,
    rows: usize,
}

impl ReportWriter {
    /// Creates (or truncates) the report file and writes the header row
    ///
    /// # Returns
    ///
    /// * `Ok(ReportWriter)` - Writer positioned to append data rows
    /// * `Err(ReportError)` - The file could not be created or written
    pub fn create(path: &Path) -> Result<Self, ReportError> {
        {
            let file = File::create(path)?;
            let mut header = csv_writer(file);
            header.write_record(REPORT_HEADER)?;
            header.flush()?;
        }

        let file = OpenOptions::new().append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(WriterState {
                writer: csv_writer(file),
                rows: 0,
            }),
        })
    }

    /// Appends one result row and flushes it to disk
    pub fn append_row(&self, result: &ScoreResult) -> Result<(), ReportError> {
        let rank = result.rank.to_string();
        let score = result.score.to_string();
        let urls = result.joined_urls();

        let mut state = self.inner.lock().map_err(|_| ReportError::Poisoned)?;
        state.writer.write_record([
            result.domain.as_str(),
            rank.as_str(),
            score.as_str(),
            urls.as_str(),
        ])?;
        state.writer.flush()?;
        state.rows += 1;

        tracing::info!("Wrote results for {}", result.domain);
        Ok(())
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> usize {
        self.inner.lock().map(|state| state.rows).unwrap_or(0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn csv_writer(file: File) -> csv::Writer<File> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file)
}
