//! Route definitions for the audit service HTTP API.
//!
//! All routes are organized by audience and mounted under `/api`.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;
    let body_limit = server.body_limit_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds.max(1));
    let cors = middleware::cors::build_cors_layer(&server.cors);

    // Audit runs wait on the model's retry cycle and are never cut short.
    let timed_routes = Router::new()
        .merge(health_routes())
        .merge(public_routes())
        .merge(account_routes())
        .merge(review_routes())
        .layer(TimeoutLayer::new(timeout));

    let api_routes = Router::new().merge(audit_routes()).merge(timed_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and readiness
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::ready))
}

/// Audit runs
fn audit_routes() -> Router<AppState> {
    Router::new().route("/audits", post(handlers::audit::submit_audit))
}

/// Report pages and sign-up
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/{id}", get(handlers::report::get_report))
        .route(
            "/reports/{id}/approval",
            post(handlers::report::request_approval),
        )
        .route("/subscribers", post(handlers::subscriber::subscribe))
}

/// Signed-in account
fn account_routes() -> Router<AppState> {
    Router::new().route("/me", get(handlers::account::me))
}

/// Reviewer-only endpoints
fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/review/reports/{id}", get(handlers::review::get_report))
        .route(
            "/review/reports/{id}/approve",
            post(handlers::review::approve),
        )
        .route("/review/reports/{id}/deny", post(handlers::review::deny))
        .route("/review/jobs", get(handlers::review::list_jobs))
        .route("/review/jobs/{id}/retry", post(handlers::review::retry_job))
}
