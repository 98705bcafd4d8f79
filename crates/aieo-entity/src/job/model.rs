//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use aieo_core::types::JobId;

use super::payload::JobPayload;
use super::status::JobStatus;

/// A background job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Job type identifier (e.g. `"lead_sync"`).
    pub job_type: String,
    /// Job-specific payload (JSON).
    pub payload: serde_json::Value,
    /// Result data on completion (JSON).
    pub result: Option<serde_json::Value>,
    /// Last error message.
    pub error_message: Option<String>,
    /// Current job status.
    pub status: JobStatus,
    /// Number of execution attempts so far.
    pub attempts: i32,
    /// Maximum allowed attempts.
    pub max_attempts: i32,
    /// Earliest time the job may run.
    pub run_at: DateTime<Utc>,
    /// When the current or last attempt started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Whether another attempt is allowed after a transient failure.
    pub fn has_attempts_left(&self) -> bool {
        self.attempts < self.max_attempts
    }

    /// Decode the typed payload.
    pub fn typed_payload(&self) -> Result<JobPayload, serde_json::Error> {
        let mut value = self.payload.clone();
        if let Some(map) = value.as_object_mut() {
            map.entry("job_type")
                .or_insert_with(|| serde_json::Value::String(self.job_type.clone()));
        }
        serde_json::from_value(value)
    }
}

/// Data required to create a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    /// Job type identifier.
    pub job_type: String,
    /// Job-specific payload.
    pub payload: serde_json::Value,
    /// Maximum attempts.
    pub max_attempts: i32,
    /// Earliest run time (`None` = now).
    pub run_at: Option<DateTime<Utc>>,
}

impl CreateJob {
    /// Build a job from a typed payload.
    pub fn from_payload(payload: &JobPayload, max_attempts: i32) -> Result<Self, serde_json::Error> {
        Ok(Self {
            job_type: payload.job_type().to_string(),
            payload: serde_json::to_value(payload)?,
            max_attempts,
            run_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::payload::{LEAD_SYNC, LeadSyncPayload};
    use aieo_core::types::ReportId;

    #[test]
    fn test_payload_round_trip_through_create() {
        let report_id = ReportId::new();
        let create =
            CreateJob::from_payload(&JobPayload::LeadSync(LeadSyncPayload { report_id }), 5)
                .expect("create");
        assert_eq!(create.job_type, LEAD_SYNC);

        let now = Utc::now();
        let job = Job {
            id: JobId::new(),
            job_type: create.job_type,
            payload: create.payload,
            result: None,
            error_message: None,
            status: JobStatus::Pending,
            attempts: 0,
            max_attempts: 5,
            run_at: now,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        match job.typed_payload().expect("decode") {
            JobPayload::LeadSync(p) => assert_eq!(p.report_id, report_id),
        }
        assert!(job.has_attempts_left());
    }
}
