//! Persisted audit reports and their approval status.

pub mod model;
pub mod status;

pub use model::{Report, ReportContent, ReportSummary};
pub use status::ReportStatus;
