//! # aieo-api
//!
//! HTTP API layer for the audit service built on Axum.
//!
//! Provides the public audit and report endpoints, the account endpoint,
//! the reviewer endpoints, middleware (logging, CORS), extractors and DTOs.

pub mod auth;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use auth::TokenVerifier;
pub use router::build_router;
pub use state::AppState;
