//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use dayplan_app::ports::TimeBlockRepository;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and exposes `/health`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R>(state: AppState<R>) -> Router
where
    R: TimeBlockRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::USER_ID_HEADER;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use dayplan_app::services::time_block_service::TimeBlockService;
    use dayplan_domain::error::DayPlanError;
    use dayplan_domain::id::{TimeBlockId, UserId};
    use dayplan_domain::time_block::TimeBlock;
    use tower::ServiceExt;

    /// Repository that holds nothing and accepts every write.
    struct StubTimeBlockRepo;

    impl TimeBlockRepository for StubTimeBlockRepo {
        async fn find_by_user(&self, _user_id: UserId) -> Result<Vec<TimeBlock>, DayPlanError> {
            Ok(vec![])
        }
        async fn get_by_id(
            &self,
            _id: TimeBlockId,
            _user_id: UserId,
        ) -> Result<Option<TimeBlock>, DayPlanError> {
            Ok(None)
        }
        async fn create(&self, block: TimeBlock) -> Result<TimeBlock, DayPlanError> {
            Ok(block)
        }
        async fn update(&self, block: TimeBlock) -> Result<Option<TimeBlock>, DayPlanError> {
            Ok(Some(block))
        }
        async fn delete(&self, _id: TimeBlockId, _user_id: UserId) -> Result<bool, DayPlanError> {
            Ok(false)
        }
        async fn reorder(
            &self,
            _user_id: UserId,
            _ids: Vec<TimeBlockId>,
        ) -> Result<(), DayPlanError> {
            Ok(())
        }
    }

    fn app() -> Router {
        build(AppState::new(TimeBlockService::new(StubTimeBlockRepo)))
    }

    fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_ID_HEADER, UserId::new().to_string())
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_return_unauthorized_without_user_header() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/time-blocks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_list_time_blocks_for_identified_user() {
        let response = app()
            .oneshot(request("GET", "/api/time-blocks", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_create_time_block() {
        let response = app()
            .oneshot(request(
                "POST",
                "/api/time-blocks",
                r#"{"name":"Deep work","duration":120}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn should_reject_block_longer_than_a_day() {
        let response = app()
            .oneshot(request(
                "POST",
                "/api/time-blocks",
                r#"{"name":"Too long","duration":1441}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_reject_payload_carrying_an_owner() {
        let response = app()
            .oneshot(request(
                "POST",
                "/api/time-blocks",
                &format!(
                    r#"{{"name":"Sneaky","duration":10,"user_id":"{}"}}"#,
                    UserId::new()
                ),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn should_return_bad_request_for_malformed_id() {
        let response = app()
            .oneshot(request("DELETE", "/api/time-blocks/not-a-uuid", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_unknown_block() {
        let uri = format!("/api/time-blocks/{}", TimeBlockId::new());
        let response = app().oneshot(request("DELETE", &uri, "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_unknown_block() {
        let uri = format!("/api/time-blocks/{}", TimeBlockId::new());
        let response = app()
            .oneshot(request("PUT", &uri, r#"{"name":"Renamed"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_route_update_order_ahead_of_id_route() {
        let body = format!(r#"{{"ids":["{}"]}}"#, TimeBlockId::new());
        let response = app()
            .oneshot(request("PUT", "/api/time-blocks/update-order", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
