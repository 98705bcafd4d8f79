//! # aieo-delivery
//!
//! Outbound notification channels. [`review`] tells a human reviewer that a
//! report is waiting for a decision; [`mailing`] pushes approved contacts to
//! the mailing list.

pub mod error;
pub mod mailing;
pub mod review;

pub use error::DeliveryError;
pub use mailing::{LeadSink, MailerLiteClient, Subscriber, SyncOutcome};
pub use review::{ApprovalNotice, DiscordNotifier, ReviewerNotifier};

/// Cut `value` to at most `limit` characters.
pub(crate) fn truncate(value: &str, limit: usize) -> String {
    value.chars().take(limit).collect()
}
