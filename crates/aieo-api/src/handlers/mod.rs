//! Route handlers organized by domain.

pub mod account;
pub mod audit;
pub mod health;
pub mod report;
pub mod review;
pub mod subscriber;
