//! JSON REST handlers for time blocks.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use dayplan_app::ports::TimeBlockRepository;
use dayplan_domain::error::ValidationError;
use dayplan_domain::id::TimeBlockId;
use dayplan_domain::time_block::{NewTimeBlock, TimeBlock, TimeBlockPatch};

use crate::error::ApiError;
use crate::identity::CurrentUser;
use crate::state::AppState;

/// Request body for creating a time block.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTimeBlockRequest {
    pub name: String,
    pub color: Option<String>,
    pub duration: u32,
    pub order: Option<i64>,
}

/// Request body for patching a time block. Absent fields stay as they are.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTimeBlockRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl From<UpdateTimeBlockRequest> for TimeBlockPatch {
    fn from(req: UpdateTimeBlockRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
            duration: req.duration,
            order: req.order,
        }
    }
}

/// Request body for reordering: block ids in their new display order.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderRequest {
    pub ids: Vec<String>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<TimeBlock>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<TimeBlock>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the update endpoint.
pub enum UpdateResponse {
    Ok(Json<TimeBlock>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete and update-order endpoints.
pub enum NoContentResponse {
    NoContent,
}

impl IntoResponse for NoContentResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<TimeBlockId, ApiError> {
    TimeBlockId::from_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_string()).into())
}

/// `GET /api/time-blocks`
pub async fn list<R>(
    State(state): State<AppState<R>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<ListResponse, ApiError>
where
    R: TimeBlockRepository + Send + Sync + 'static,
{
    let blocks = state.time_block_service.list_time_blocks(user_id).await?;
    Ok(ListResponse::Ok(Json(blocks)))
}

/// `POST /api/time-blocks`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<CreateTimeBlockRequest>,
) -> Result<CreateResponse, ApiError>
where
    R: TimeBlockRepository + Send + Sync + 'static,
{
    let mut builder = NewTimeBlock::builder()
        .name(req.name)
        .duration(req.duration);
    if let Some(color) = req.color {
        builder = builder.color(color);
    }
    if let Some(order) = req.order {
        builder = builder.order(order);
    }

    let draft = builder.build()?;
    let created = state
        .time_block_service
        .create_time_block(draft, user_id)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/time-blocks/:id`
pub async fn update<R>(
    State(state): State<AppState<R>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTimeBlockRequest>,
) -> Result<UpdateResponse, ApiError>
where
    R: TimeBlockRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    let updated = state
        .time_block_service
        .update_time_block(req.into(), id, user_id)
        .await?;
    Ok(UpdateResponse::Ok(Json(updated)))
}

/// `DELETE /api/time-blocks/:id`
pub async fn delete<R>(
    State(state): State<AppState<R>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<NoContentResponse, ApiError>
where
    R: TimeBlockRepository + Send + Sync + 'static,
{
    let id = parse_id(&id)?;
    state
        .time_block_service
        .delete_time_block(id, user_id)
        .await?;
    Ok(NoContentResponse::NoContent)
}

/// `PUT /api/time-blocks/update-order`
pub async fn update_order<R>(
    State(state): State<AppState<R>>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<NoContentResponse, ApiError>
where
    R: TimeBlockRepository + Send + Sync + 'static,
{
    let ids = req
        .ids
        .iter()
        .map(String::as_str)
        .map(parse_id)
        .collect::<Result<Vec<_>, _>>()?;
    state
        .time_block_service
        .reorder_time_blocks(ids, user_id)
        .await?;
    Ok(NoContentResponse::NoContent)
}
