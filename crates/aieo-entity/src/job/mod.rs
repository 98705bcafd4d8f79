//! Background job domain entities.

pub mod model;
pub mod payload;
pub mod status;

pub use model::{CreateJob, Job};
pub use payload::{JobPayload, LeadSyncPayload};
pub use status::JobStatus;
