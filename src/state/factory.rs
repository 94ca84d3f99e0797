use crate::config::StateConfig;
use crate::error::{AppError, Result};
use crate::state::{BrdReadStore, InMemoryBrdStore};
use std::sync::Arc;

/// Create the read store based on configuration
pub fn create_store(config: &StateConfig) -> Result<Arc<dyn BrdReadStore>> {
    match config.fixture_path.as_ref() {
        Some(path) => {
            tracing::info!(path = ?path, "Seeding in-memory store from fixture");

            let store = InMemoryBrdStore::from_fixture_file(path).map_err(|e| {
                AppError::Configuration(format!(
                    "failed to load fixture {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("No fixture configured, starting with an empty in-memory store");
            Ok(Arc::new(InMemoryBrdStore::new()))
        }
    }
}
