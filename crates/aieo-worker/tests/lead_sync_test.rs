//! Lead-sync jobs driven through the worker runner on in-memory stores.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use aieo_core::config::WorkerConfig;
use aieo_core::types::{JobId, PublicLinks, ReportId};
use aieo_database::memory::{MemoryJobStore, MemoryReportStore};
use aieo_database::{JobStore, ReportStore};
use aieo_delivery::{DeliveryError, LeadSink, Subscriber, SyncOutcome};
use aieo_entity::fixtures::{sample_inputs, sample_result};
use aieo_entity::job::{CreateJob, JobPayload, JobStatus, LeadSyncPayload};
use aieo_worker::jobs::LeadSyncJobHandler;
use aieo_worker::{JobExecutor, JobQueue, WorkerRunner};

#[derive(Debug, Clone, Copy)]
enum Reply {
    Synced,
    Skipped,
    Status(u16),
}

#[derive(Debug)]
struct FakeSink {
    reply: Reply,
    received: Mutex<Vec<Subscriber>>,
}

impl FakeSink {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            received: Mutex::new(Vec::new()),
        })
    }

    fn received(&self) -> Vec<Subscriber> {
        self.received.lock().expect("lock").clone()
    }
}

#[async_trait]
impl LeadSink for FakeSink {
    async fn add_subscriber(&self, subscriber: &Subscriber) -> Result<SyncOutcome, DeliveryError> {
        self.received.lock().expect("lock").push(subscriber.clone());
        match self.reply {
            Reply::Synced => Ok(SyncOutcome::Synced),
            Reply::Skipped => Ok(SyncOutcome::Skipped),
            Reply::Status(status) => Err(DeliveryError::HttpStatus {
                status,
                body: "nope".to_string(),
            }),
        }
    }
}

struct Rig {
    reports: Arc<MemoryReportStore>,
    jobs: Arc<MemoryJobStore>,
    queue: Arc<JobQueue>,
    runner: WorkerRunner,
}

fn rig(sink: Arc<FakeSink>) -> Rig {
    let reports = Arc::new(MemoryReportStore::new());
    let jobs = Arc::new(MemoryJobStore::new());
    let queue = Arc::new(JobQueue::new(jobs.clone()));

    let mut executor = JobExecutor::new();
    executor.register(Arc::new(LeadSyncJobHandler::new(
        reports.clone(),
        sink,
        Some(PublicLinks::new("https://audit.example/")),
    )));

    let runner = WorkerRunner::new(
        queue.clone(),
        Arc::new(executor),
        WorkerConfig {
            retry_delay_seconds: 60,
            ..Default::default()
        },
    );

    Rig {
        reports,
        jobs,
        queue,
        runner,
    }
}

async fn approved_report(reports: &MemoryReportStore) -> ReportId {
    let id = reports
        .save(&sample_inputs(), &sample_result(), None)
        .await
        .expect("save");
    reports
        .set_pending(id, "ana@crumb.example", "Ana Silva")
        .await
        .expect("pending");
    reports.set_approved(id).await.expect("approve");
    id
}

async fn enqueue_sync(queue: &JobQueue, report_id: ReportId, max_attempts: i32) -> JobId {
    queue
        .enqueue(
            &JobPayload::LeadSync(LeadSyncPayload { report_id }),
            max_attempts,
        )
        .await
        .expect("enqueue")
        .id
}

#[tokio::test]
async fn test_approved_report_is_synced() {
    let sink = FakeSink::new(Reply::Synced);
    let rig = rig(sink.clone());
    let report_id = approved_report(&rig.reports).await;
    let job_id = enqueue_sync(&rig.queue, report_id, 5).await;

    assert!(rig.runner.process_next().await);

    let job = rig.jobs.find_by_id(job_id).await.expect("find").expect("job");
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result, Some(serde_json::json!({ "synced": true })));

    let received = sink.received();
    assert_eq!(received.len(), 1);
    let subscriber = &received[0];
    assert_eq!(subscriber.email, "ana@crumb.example");
    assert_eq!(subscriber.name.as_deref(), Some("Ana Silva"));
    assert_eq!(subscriber.company, "Crumb & Co");
    assert_eq!(subscriber.industry, "Bakery");
    assert_eq!(
        subscriber.report_url.as_deref(),
        Some(format!("https://audit.example/report/{report_id}").as_str())
    );
    assert_eq!(subscriber.ai_score, Some(72.0));
}

#[tokio::test]
async fn test_unconfigured_mailing_list_completes_as_skipped() {
    let rig = rig(FakeSink::new(Reply::Skipped));
    let report_id = approved_report(&rig.reports).await;
    let job_id = enqueue_sync(&rig.queue, report_id, 5).await;

    assert!(rig.runner.process_next().await);

    let job = rig.jobs.find_by_id(job_id).await.expect("find").expect("job");
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.result, Some(serde_json::json!({ "skipped": true })));
}

#[tokio::test]
async fn test_server_error_is_rescheduled_with_backoff() {
    let rig = rig(FakeSink::new(Reply::Status(503)));
    let report_id = approved_report(&rig.reports).await;
    let job_id = enqueue_sync(&rig.queue, report_id, 5).await;

    let before = Utc::now();
    assert!(rig.runner.process_next().await);

    let job = rig.jobs.find_by_id(job_id).await.expect("find").expect("job");
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.attempts, 1);
    assert!(job.error_message.as_deref().is_some_and(|m| m.contains("503")));
    assert!(job.run_at >= before + chrono::Duration::seconds(59));

    // Not due yet.
    assert!(!rig.runner.process_next().await);
}

#[tokio::test]
async fn test_transient_failure_on_last_attempt_fails_the_job() {
    let rig = rig(FakeSink::new(Reply::Status(429)));
    let report_id = approved_report(&rig.reports).await;
    let job_id = enqueue_sync(&rig.queue, report_id, 1).await;

    assert!(rig.runner.process_next().await);

    let job = rig.jobs.find_by_id(job_id).await.expect("find").expect("job");
    assert_eq!(job.status, JobStatus::Failed);
}

#[tokio::test]
async fn test_client_error_fails_without_retry() {
    let rig = rig(FakeSink::new(Reply::Status(422)));
    let report_id = approved_report(&rig.reports).await;
    let job_id = enqueue_sync(&rig.queue, report_id, 5).await;

    assert!(rig.runner.process_next().await);

    let job = rig.jobs.find_by_id(job_id).await.expect("find").expect("job");
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.attempts, 1);
}

#[tokio::test]
async fn test_report_that_is_not_approved_is_never_synced() {
    let sink = FakeSink::new(Reply::Synced);
    let rig = rig(sink.clone());
    let report_id = rig
        .reports
        .save(&sample_inputs(), &sample_result(), None)
        .await
        .expect("save");
    let job_id = enqueue_sync(&rig.queue, report_id, 5).await;

    assert!(rig.runner.process_next().await);

    let job = rig.jobs.find_by_id(job_id).await.expect("find").expect("job");
    assert_eq!(job.status, JobStatus::Failed);
    assert!(sink.received().is_empty());
}

#[tokio::test]
async fn test_unknown_job_type_fails() {
    let rig = rig(FakeSink::new(Reply::Synced));
    let job = rig
        .jobs
        .create(&CreateJob {
            job_type: "thumbnail".to_string(),
            payload: serde_json::json!({}),
            max_attempts: 3,
            run_at: None,
        })
        .await
        .expect("create");

    assert!(rig.runner.process_next().await);

    let job = rig.jobs.find_by_id(job.id).await.expect("find").expect("job");
    assert_eq!(job.status, JobStatus::Failed);
    assert!(
        job.error_message
            .as_deref()
            .is_some_and(|m| m.contains("No handler registered"))
    );
}

#[tokio::test]
async fn test_queue_stats_track_outcomes() {
    let rig = rig(FakeSink::new(Reply::Synced));
    let report_id = approved_report(&rig.reports).await;
    enqueue_sync(&rig.queue, report_id, 5).await;
    enqueue_sync(&rig.queue, ReportId::new(), 5).await;

    assert_eq!(rig.queue.stats().await.expect("stats").pending, 2);

    while rig.runner.process_next().await {}

    let stats = rig.queue.stats().await.expect("stats");
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.failed, 1);
}

#[tokio::test]
async fn test_run_stops_on_shutdown_signal() {
    let rig = rig(FakeSink::new(Reply::Synced));
    let report_id = approved_report(&rig.reports).await;
    let job_id = enqueue_sync(&rig.queue, report_id, 5).await;

    let (tx, rx) = tokio::sync::watch::channel(false);
    let runner = rig.runner.clone();
    let handle = tokio::spawn(async move { runner.run(rx).await });

    for _ in 0..100 {
        let job = rig.jobs.find_by_id(job_id).await.expect("find").expect("job");
        if job.status == JobStatus::Completed {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    tx.send(true).expect("send");
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .expect("runner stopped")
        .expect("join");

    let job = rig.jobs.find_by_id(job_id).await.expect("find").expect("job");
    assert_eq!(job.status, JobStatus::Completed);
}
