//! Fakes and wiring shared by the service tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use aieo_core::types::PublicLinks;
use aieo_database::memory::{MemoryJobStore, MemoryReportStore, MemoryUsageCounter};
use aieo_delivery::{ApprovalNotice, DeliveryError, ReviewerNotifier};
use aieo_generation::client::RetryPolicy;
use aieo_generation::{FallbackGenerator, Generation, GenerationError, TextGenerator};
use aieo_service::{ApprovalGate, AuditService, UsagePolicy};

/// Returns the same text on every call and counts calls.
#[derive(Debug)]
pub struct CannedGenerator {
    text: String,
    calls: AtomicUsize,
}

impl CannedGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str, _model: &str) -> Result<Generation, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Generation {
            text: self.text.clone(),
            citations: Vec::new(),
        })
    }
}

/// Records notices; can be switched to unconfigured or failing.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub unconfigured: bool,
    pub failing: bool,
    pub notices: Mutex<Vec<ApprovalNotice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<ApprovalNotice> {
        self.notices.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ReviewerNotifier for RecordingNotifier {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn notify(&self, notice: &ApprovalNotice) -> Result<(), DeliveryError> {
        if self.unconfigured {
            return Err(DeliveryError::NotConfigured("Reviewer webhook"));
        }
        if self.failing {
            return Err(DeliveryError::HttpStatus {
                status: 500,
                body: "down".to_string(),
            });
        }
        self.notices.lock().expect("lock").push(notice.clone());
        Ok(())
    }
}

/// Everything a test needs, backed by memory stores.
pub struct Harness {
    pub generator: Arc<CannedGenerator>,
    pub notifier: Arc<RecordingNotifier>,
    pub reports: MemoryReportStore,
    pub counter: MemoryUsageCounter,
    pub jobs: MemoryJobStore,
    pub audits: AuditService,
    pub gate: ApprovalGate,
    pub links: PublicLinks,
}

impl Harness {
    pub fn new(model_text: &str) -> Self {
        Self::with_notifier(model_text, RecordingNotifier::default())
    }

    pub fn with_notifier(model_text: &str, notifier: RecordingNotifier) -> Self {
        let generator = Arc::new(CannedGenerator::new(model_text));
        let notifier = Arc::new(notifier);
        let reports = MemoryReportStore::new();
        let counter = MemoryUsageCounter::new();
        let jobs = MemoryJobStore::new();

        let fallback = FallbackGenerator::new(
            generator.clone(),
            "primary",
            "secondary",
            RetryPolicy::default(),
        );
        let audits = AuditService::new(
            Arc::new(reports.clone()),
            UsagePolicy::new(Arc::new(counter.clone()), 2),
            fallback,
        );
        let gate = ApprovalGate::new(
            Arc::new(reports.clone()),
            notifier.clone(),
            Arc::new(jobs.clone()),
            5,
        );

        Self {
            generator,
            notifier,
            reports,
            counter,
            jobs,
            audits,
            gate,
            links: PublicLinks::new("https://audit.example"),
        }
    }
}

/// The fixture result wrapped in a markdown fence with some prose.
pub fn fenced_result() -> String {
    let mut value = aieo_entity::fixtures::sample_result_json();
    value["foundation"]["status"] = "Excellent".into();
    value["socialFootprint"][0]["presence"] = "very active".into();
    format!(
        "Here is the audit you asked for:\n```json\n{}\n```\nLet me know if you need more.",
        serde_json::to_string_pretty(&value).expect("json")
    )
}
