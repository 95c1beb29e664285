//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use dayplan_domain::error::{DayPlanError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

/// Maps [`DayPlanError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(DayPlanError);

impl From<DayPlanError> for ApiError {
    fn from(err: DayPlanError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DayPlanError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            DayPlanError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            DayPlanError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
