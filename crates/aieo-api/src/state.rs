//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use aieo_core::config::AppConfig;
use aieo_database::{JobStore, ReportStore};
use aieo_service::{ApprovalGate, AuditService, SubscriptionService};

use crate::auth::TokenVerifier;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime
    pub started_at: Instant,

    // ── Auth ─────────────────────────────────────────────────
    /// Account token verifier
    pub tokens: Arc<TokenVerifier>,

    // ── Stores ───────────────────────────────────────────────
    /// Report store, used for readiness checks
    pub reports: Arc<dyn ReportStore>,
    /// Job store behind the reviewer job endpoints
    pub jobs: Arc<dyn JobStore>,

    // ── Services ─────────────────────────────────────────────
    /// Audit runs and report reads
    pub audits: Arc<AuditService>,
    /// Report approval gate
    pub approvals: Arc<ApprovalGate>,
    /// Direct mailing-list sign-up
    pub subscriptions: Arc<SubscriptionService>,
}
