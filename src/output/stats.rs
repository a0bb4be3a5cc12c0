//! Run statistics
//!
//! Counts what happened to each domain during a crawl run, for the summary
//! logged when the run finishes.

use crate::crawler::Score;

/// Summary of a finished crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Domains that passed the rank filter and were processed
    pub scheduled: usize,

    /// Domains skipped because they were unranked or ranked too low
    pub skipped: usize,

    /// Rows written with a readability score
    pub scored: usize,

    /// Rows written with the `-1` sentinel
    pub unavailable: usize,

    /// Domain tasks that panicked (a sentinel row is still written)
    pub failed_tasks: usize,

    /// Rows that could not be written to the report
    pub write_errors: usize,
}

impl CrawlSummary {
    /// Records the outcome of one processed domain
    pub fn record(&mut self, score: &Score) {
        if score.is_unavailable() {
            self.unavailable += 1;
        } else {
            self.scored += 1;
        }
    }

    /// Total rows written to the report
    pub fn rows(&self) -> usize {
        self.scored + self.unavailable
    }

    /// Percentage of scheduled domains that produced a score
    pub fn success_rate(&self) -> f64 {
        if self.scheduled == 0 {
            0.0
        } else {
            (self.scored as f64 / self.scheduled as f64) * 100.0
        }
    }

    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!(
            "Crawl summary: {} scheduled, {} skipped, {} scored, {} unavailable ({:.1}% scored)",
            self.scheduled,
            self.skipped,
            self.scored,
            self.unavailable,
            self.success_rate()
        );
        if self.failed_tasks > 0 {
            tracing::warn!("{} domain tasks failed unexpectedly", self.failed_tasks);
        }
        if self.write_errors > 0 {
            tracing::error!("{} rows could not be written", self.write_errors);
        }
    }
}
