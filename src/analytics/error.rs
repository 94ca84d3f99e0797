//! Error types for dashboard analytics

use crate::error::AppError;
use crate::state::StoreError;

/// Result type for analytics operations
pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while aggregating dashboard metrics
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Request parameters failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// An upstream read contract failed
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<StoreError> for AnalyticsError {
    fn from(err: StoreError) -> Self {
        AnalyticsError::Upstream(err.to_string())
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::Validation(msg) => AppError::Validation(msg),
            AnalyticsError::Upstream(msg) => AppError::Upstream(msg),
            AnalyticsError::InvalidConfiguration(msg) => AppError::Configuration(msg),
        }
    }
}
