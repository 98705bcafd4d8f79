//! # aieo-service
//!
//! Use cases of the audit service. Services take their collaborators as
//! `Arc<dyn Trait>` at construction so the same code runs on PostgreSQL or
//! the in-memory stores.

pub mod approval;
pub mod audit;
pub mod quota;
pub mod subscription;
pub mod validation;

pub use approval::ApprovalGate;
pub use audit::{AuditOutcome, AuditService};
pub use quota::{QuotaStatus, UsagePolicy};
pub use subscription::{SubscribeRequest, SubscriptionService};
pub use validation::{ContactDetails, validate_contact, validate_inputs, validation_error};
