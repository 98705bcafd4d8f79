//! Process-local store implementations.
//!
//! Selected with `database.backend = "memory"`. Data is lost on restart;
//! intended for development, demos and tests.

pub mod job;
pub mod profile;
pub mod report;

pub use job::MemoryJobStore;
pub use profile::MemoryUsageCounter;
pub use report::MemoryReportStore;
