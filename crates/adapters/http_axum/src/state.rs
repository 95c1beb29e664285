//! Shared application state for axum handlers.

use std::sync::Arc;

use dayplan_app::ports::TimeBlockRepository;
use dayplan_app::services::time_block_service::TimeBlockService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository type to avoid dynamic dispatch.
/// `Clone` is implemented manually so the repository itself does not need to
/// be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<R> {
    /// Time block use-cases.
    pub time_block_service: Arc<TimeBlockService<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            time_block_service: Arc::clone(&self.time_block_service),
        }
    }
}

impl<R> AppState<R>
where
    R: TimeBlockRepository + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(time_block_service: TimeBlockService<R>) -> Self {
        Self {
            time_block_service: Arc::new(time_block_service),
        }
    }
}
