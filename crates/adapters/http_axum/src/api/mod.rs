//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod time_blocks;

use axum::Router;
use axum::routing::{get, put};

use dayplan_app::ports::TimeBlockRepository;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: TimeBlockRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/time-blocks",
            get(time_blocks::list::<R>).post(time_blocks::create::<R>),
        )
        // Static segment wins over `{id}` when matching.
        .route(
            "/time-blocks/update-order",
            put(time_blocks::update_order::<R>),
        )
        .route(
            "/time-blocks/{id}",
            put(time_blocks::update::<R>).delete(time_blocks::delete::<R>),
        )
}
