//! Approval status of a report.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use aieo_core::error::AppError;

/// Where a report sits in the approval workflow.
///
/// `Open` is the initial state and is stored as `NULL`. `Approved` and
/// `Denied` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Generated, no contact details submitted yet.
    #[default]
    Open,
    /// Contact details submitted, waiting for a reviewer.
    Pending,
    /// Reviewer released the full report.
    Approved,
    /// Reviewer declined the request.
    Denied,
}

impl ReportStatus {
    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Denied)
    }

    /// Whether the requester may (re)submit contact details.
    pub fn accepts_approval_request(&self) -> bool {
        matches!(self, Self::Open | Self::Pending)
    }

    /// Whether a reviewer may approve or deny.
    pub fn awaits_decision(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Value written to the nullable `status` column.
    pub fn to_column(&self) -> Option<&'static str> {
        match self {
            Self::Open => None,
            other => Some(other.as_str()),
        }
    }

    /// Read the nullable `status` column.
    pub fn from_column(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None => Ok(Self::Open),
            Some(s) => s.parse(),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            _ => Err(AppError::validation(format!("Invalid report status: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_round_trips_through_null() {
        assert_eq!(ReportStatus::Open.to_column(), None);
        assert_eq!(
            ReportStatus::from_column(None).expect("null"),
            ReportStatus::Open
        );
        assert_eq!(
            ReportStatus::from_column(Some("approved")).expect("approved"),
            ReportStatus::Approved
        );
        assert!(ReportStatus::from_column(Some("archived")).is_err());
    }

    #[test]
    fn test_only_pending_awaits_decision() {
        for status in [
            ReportStatus::Open,
            ReportStatus::Approved,
            ReportStatus::Denied,
        ] {
            assert!(!status.awaits_decision());
        }
        assert!(ReportStatus::Pending.awaits_decision());
    }

    #[test]
    fn test_terminal_states_reject_requests() {
        assert!(!ReportStatus::Approved.accepts_approval_request());
        assert!(!ReportStatus::Denied.accepts_approval_request());
        assert!(ReportStatus::Pending.accepts_approval_request());
    }
}
