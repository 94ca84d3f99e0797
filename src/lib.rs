//! BRD dashboard metrics service
//!
//! Aggregates BRD snapshots and their audit trail into per-period transition
//! averages, prefill trends, weekly upload grids and status overviews, and
//! serves them over HTTP.

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod state;

pub use error::{AppError, Result};
