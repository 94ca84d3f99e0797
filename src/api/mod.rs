pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::analytics::MetricsFacade;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<MetricsFacade>,
    pub request_timeout: Duration,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(facade: Arc<MetricsFacade>) -> Self {
        Self {
            facade,
            request_timeout: Duration::from_secs(30),
            started_at: Instant::now(),
        }
    }

    /// Set the per-request timeout applied by the router
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
