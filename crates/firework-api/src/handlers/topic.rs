// ============================================================================
// Firework API - Topic Handlers
// File: crates/firework-api/src/handlers/topic.rs
// ============================================================================
//! List, read, publish to and create topics

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        Path, State,
    },
    Json,
};

use tracing::debug;

use firework_core::{error::BrokerError, Topic};

use crate::dto::CreateTopicRequest;
use crate::error::{ApiError, RequestContext};
use crate::response::RestResponse;
use crate::state::AppState;

/// GET /topic
pub async fn list_topics(State(state): State<AppState>) -> RestResponse<Vec<Topic>> {
    RestResponse::success(state.broker.list_topics().await)
}

/// GET /topic/{name}
pub async fn get_topic(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(name): Path<String>,
) -> Result<RestResponse<Topic>, ApiError> {
    let topic = state.broker.get_topic(&name).await.map_err(|e| ctx.fail(e))?;
    Ok(RestResponse::success(topic))
}

/// POST /topic/{name} - the raw body is the message. A request without a
/// body is not accepted.
pub async fn publish(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(name): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<RestResponse<bool>, ApiError> {
    let body = body.map_err(|e| ctx.fail(BrokerError::unexpected(e.body_text())))?;
    if body.is_empty() {
        debug!("Publish to {} without a body not accepted", name);
        return Ok(RestResponse::success(false));
    }
    let message = std::str::from_utf8(&body).map_err(|e| ctx.fail(BrokerError::unexpected(e)))?;

    Ok(RestResponse::success(state.broker.publish(&name, message).await))
}

/// PUT /topic/{name}
pub async fn create_topic(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(name): Path<String>,
    payload: Result<Json<CreateTopicRequest>, JsonRejection>,
) -> Result<RestResponse<bool>, ApiError> {
    let Json(payload) = payload.map_err(|e| ctx.fail(BrokerError::unexpected(e.body_text())))?;

    let created = state
        .broker
        .create_topic(&name, &payload.req_key)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(RestResponse::success(created))
}
