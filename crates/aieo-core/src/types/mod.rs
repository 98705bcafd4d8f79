//! Core type definitions used across the workspace.

pub mod id;
pub mod links;
pub mod response;

pub use id::*;
pub use links::PublicLinks;
pub use response::ApiErrorResponse;
