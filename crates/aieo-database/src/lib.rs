//! # aieo-database
//!
//! Persistence for the audit service. [`store`] declares the ports the
//! service layer depends on; [`repositories`] implements them on
//! PostgreSQL and [`memory`] implements them on process-local maps.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{JobStore, ReportStore, UsageCounter};
