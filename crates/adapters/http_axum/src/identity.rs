//! Caller identity.
//!
//! Authentication happens upstream; by the time a request reaches this
//! adapter the `x-user-id` header carries the already-authenticated user and
//! is trusted as-is.

use std::str::FromStr;

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use dayplan_domain::id::UserId;

use crate::error::ErrorBody;

/// Header holding the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf the request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(IdentityRejection::Missing)?;
        let value = value.to_str().map_err(|_| IdentityRejection::Invalid)?;
        UserId::from_str(value.trim())
            .map(Self)
            .map_err(|_| IdentityRejection::Invalid)
    }
}

/// Why a request could not be attributed to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRejection {
    Missing,
    Invalid,
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let error = match self {
            Self::Missing => format!("missing {USER_ID_HEADER} header"),
            Self::Invalid => format!("{USER_ID_HEADER} header is not a valid user id"),
        };
        (StatusCode::UNAUTHORIZED, Json(ErrorBody { error })).into_response()
    }
}
