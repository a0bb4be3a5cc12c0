//! Output generation
//!
//! The CSV report is the only durable artifact of a run. This module holds
//! the report writer and the end-of-run summary.

mod report;
mod stats;

pub use report::{ReportWriter, REPORT_HEADER};
pub use stats::CrawlSummary;
