//! Approval gate transitions.

mod common;

use std::sync::Arc;

use async_trait::async_trait;

use aieo_core::error::ErrorKind;
use aieo_core::result::AppResult;
use aieo_core::types::{AccountId, ReportId};
use aieo_database::memory::{MemoryJobStore, MemoryReportStore};
use aieo_database::{JobStore, ReportStore};
use aieo_entity::fixtures::{sample_inputs, sample_result};
use aieo_entity::job::{JobPayload, JobStatus};
use aieo_entity::{AuditInputs, AuditResult, Report, ReportContent, ReportStatus, ReportSummary};
use aieo_service::ApprovalGate;

use common::{Harness, RecordingNotifier, fenced_result};

/// Memory store that yields after every status read, so racing decisions
/// both see `Pending` before either writes.
#[derive(Debug, Clone)]
struct YieldingReports(MemoryReportStore);

#[async_trait]
impl ReportStore for YieldingReports {
    async fn save(
        &self,
        inputs: &AuditInputs,
        result: &AuditResult,
        owner: Option<AccountId>,
    ) -> AppResult<ReportId> {
        self.0.save(inputs, result, owner).await
    }

    async fn get(&self, id: ReportId) -> AppResult<Option<ReportContent>> {
        self.0.get(id).await
    }

    async fn get_with_meta(&self, id: ReportId) -> AppResult<Option<Report>> {
        let report = self.0.get_with_meta(id).await;
        tokio::task::yield_now().await;
        report
    }

    async fn set_pending(&self, id: ReportId, email: &str, contact_name: &str) -> AppResult<()> {
        self.0.set_pending(id, email, contact_name).await
    }

    async fn set_approved(&self, id: ReportId) -> AppResult<()> {
        self.0.set_approved(id).await
    }

    async fn set_denied(&self, id: ReportId) -> AppResult<()> {
        self.0.set_denied(id).await
    }

    async fn discard(&self, id: ReportId) -> AppResult<bool> {
        self.0.discard(id).await
    }

    async fn list_by_owner(&self, owner: AccountId) -> AppResult<Vec<ReportSummary>> {
        self.0.list_by_owner(owner).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.0.ping().await
    }
}

async fn racing_gate() -> (ApprovalGate, MemoryReportStore, MemoryJobStore, ReportId) {
    let store = MemoryReportStore::new();
    let id = store
        .save(&sample_inputs(), &sample_result(), None)
        .await
        .expect("save");
    store
        .set_pending(id, "ana@crumb.example", "Ana")
        .await
        .expect("pending");

    let jobs = MemoryJobStore::new();
    let gate = ApprovalGate::new(
        Arc::new(YieldingReports(store.clone())),
        Arc::new(RecordingNotifier::default()),
        Arc::new(jobs.clone()),
        5,
    );
    (gate, store, jobs, id)
}

async fn saved(h: &Harness) -> ReportId {
    h.reports
        .save(&sample_inputs(), &sample_result(), None)
        .await
        .expect("save")
}

async fn status(h: &Harness, id: ReportId) -> ReportStatus {
    h.reports
        .get_with_meta(id)
        .await
        .expect("get")
        .expect("present")
        .status
}

#[tokio::test]
async fn test_request_approval_notifies_and_marks_pending() {
    let h = Harness::new(&fenced_result());
    let id = saved(&h).await;

    h.gate
        .request_approval(id, "Ana Lima", "ana@crumb.example", &h.links)
        .await
        .expect("request");

    let report = h.reports.get_with_meta(id).await.expect("get").expect("row");
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(report.contact_name.as_deref(), Some("Ana Lima"));

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].brand, "Crumb & Co");
    assert_eq!(notices[0].score, 72.0);
    assert_eq!(
        notices[0].review_url,
        format!("https://audit.example/admin/review/{id}")
    );
}

#[tokio::test]
async fn test_second_request_overwrites_email() {
    let h = Harness::new(&fenced_result());
    let id = saved(&h).await;

    h.gate
        .request_approval(id, "Ana", "first@crumb.example", &h.links)
        .await
        .expect("first");
    h.gate
        .request_approval(id, "Ana", "second@crumb.example", &h.links)
        .await
        .expect("second");

    let report = h.reports.get_with_meta(id).await.expect("get").expect("row");
    assert_eq!(report.email.as_deref(), Some("second@crumb.example"));
    assert_eq!(report.status, ReportStatus::Pending);
}

#[tokio::test]
async fn test_approve_denied_report_is_conflict() {
    let h = Harness::new(&fenced_result());
    let id = saved(&h).await;
    h.gate
        .request_approval(id, "Ana", "ana@crumb.example", &h.links)
        .await
        .expect("request");
    h.gate.deny(id).await.expect("deny");

    let err = h.gate.approve(id).await.expect_err("denied is terminal");
    assert_eq!(err.kind, ErrorKind::StateConflict);
    assert_eq!(status(&h, id).await, ReportStatus::Denied);
}

#[tokio::test]
async fn test_decisions_are_final_in_any_order() {
    let h = Harness::new(&fenced_result());

    for first_approves in [true, false] {
        let id = saved(&h).await;
        h.gate
            .request_approval(id, "Ana", "ana@crumb.example", &h.links)
            .await
            .expect("request");
        if first_approves {
            h.gate.approve(id).await.expect("approve");
        } else {
            h.gate.deny(id).await.expect("deny");
        }
        let decided = status(&h, id).await;

        for _ in 0..2 {
            assert_eq!(
                h.gate.approve(id).await.expect_err("approve").kind,
                ErrorKind::StateConflict
            );
            assert_eq!(
                h.gate.deny(id).await.expect_err("deny").kind,
                ErrorKind::StateConflict
            );
            let again = h
                .gate
                .request_approval(id, "Bo", "bo@crumb.example", &h.links)
                .await
                .expect_err("request");
            assert_eq!(again.kind, ErrorKind::StateConflict);
        }
        assert_eq!(status(&h, id).await, decided);
    }
}

#[tokio::test]
async fn test_open_report_cannot_be_decided() {
    let h = Harness::new(&fenced_result());
    let id = saved(&h).await;

    assert_eq!(
        h.gate.approve(id).await.expect_err("open").kind,
        ErrorKind::StateConflict
    );
    assert_eq!(
        h.gate.approve(ReportId::new()).await.expect_err("missing").kind,
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_approve_enqueues_lead_sync() {
    let h = Harness::new(&fenced_result());
    let id = saved(&h).await;
    h.gate
        .request_approval(id, "Ana", "ana@crumb.example", &h.links)
        .await
        .expect("request");

    h.gate.approve(id).await.expect("approve");

    let jobs = h.jobs.list(Some(JobStatus::Pending), 10).await.expect("list");
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].max_attempts, 5);
    match jobs[0].typed_payload().expect("payload") {
        JobPayload::LeadSync(p) => assert_eq!(p.report_id, id),
    }
}

#[tokio::test]
async fn test_unconfigured_notifier_is_configuration_error() {
    let h = Harness::with_notifier(
        &fenced_result(),
        RecordingNotifier {
            unconfigured: true,
            ..Default::default()
        },
    );
    let id = saved(&h).await;

    let err = h
        .gate
        .request_approval(id, "Ana", "ana@crumb.example", &h.links)
        .await
        .expect_err("unconfigured");

    assert_eq!(err.kind, ErrorKind::Configuration);
    assert_eq!(status(&h, id).await, ReportStatus::Open);
}

#[tokio::test]
async fn test_failed_notification_leaves_report_open() {
    let h = Harness::with_notifier(
        &fenced_result(),
        RecordingNotifier {
            failing: true,
            ..Default::default()
        },
    );
    let id = saved(&h).await;

    let err = h
        .gate
        .request_approval(id, "Ana", "ana@crumb.example", &h.links)
        .await
        .expect_err("delivery failed");

    assert_eq!(err.kind, ErrorKind::ExternalService);
    let report = h.reports.get_with_meta(id).await.expect("get").expect("row");
    assert_eq!(report.status, ReportStatus::Open);
    assert!(report.email.is_none());
}

#[tokio::test]
async fn test_invalid_contact_is_validation_error() {
    let h = Harness::new(&fenced_result());
    let id = saved(&h).await;

    let err = h
        .gate
        .request_approval(id, "", "nope", &h.links)
        .await
        .expect_err("invalid");
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_racing_approve_and_deny_decide_once() {
    let (gate, store, jobs, id) = racing_gate().await;

    let (approved, denied) = tokio::join!(gate.approve(id), gate.deny(id));

    assert!(approved.is_ok() != denied.is_ok());
    let loser = approved.err().or(denied.err()).expect("one conflict");
    assert_eq!(loser.kind, ErrorKind::StateConflict);

    let queued = jobs.list(None, 10).await.expect("list");
    let report = store.get_with_meta(id).await.expect("get").expect("row");
    match report.status {
        ReportStatus::Approved => assert_eq!(queued.len(), 1),
        ReportStatus::Denied => assert!(queued.is_empty()),
        other => panic!("unexpected status {other}"),
    }
}

#[tokio::test]
async fn test_racing_approvals_queue_one_sync() {
    let (gate, _, jobs, id) = racing_gate().await;

    let (first, second) = tokio::join!(gate.approve(id), gate.approve(id));

    assert!(first.is_ok() != second.is_ok());
    let queued = jobs.list(None, 10).await.expect("list");
    assert_eq!(queued.len(), 1);
}
