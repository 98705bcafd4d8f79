//! # aieo-entity
//!
//! Domain models for the audit service. Structs here are either persisted
//! rows or value objects embedded in them; all derive `Debug`, `Clone`,
//! `Serialize` and `Deserialize`.

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod inputs;
pub mod job;
pub mod profile;
pub mod report;
pub mod result;

pub use inputs::AuditInputs;
pub use profile::Profile;
pub use report::{Report, ReportContent, ReportStatus, ReportSummary};
pub use result::AuditResult;
