//! Built-in job handler implementations.

pub mod lead_sync;

pub use lead_sync::LeadSyncJobHandler;
