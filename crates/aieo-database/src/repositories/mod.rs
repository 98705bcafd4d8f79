//! PostgreSQL implementations of the store ports.

pub mod job;
pub mod profile;
pub mod report;

pub use job::JobRepository;
pub use profile::ProfileRepository;
pub use report::ReportRepository;
