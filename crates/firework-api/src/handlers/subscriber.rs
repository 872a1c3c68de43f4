// ============================================================================
// Firework API - Subscriber Handlers
// File: crates/firework-api/src/handlers/subscriber.rs
// ============================================================================

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use firework_core::{error::BrokerError, SubscriptionHandle};

use crate::dto::SubscriberRequest;
use crate::error::{ApiError, RequestContext};
use crate::response::RestResponse;
use crate::state::AppState;

/// POST /topic/{name}/subscriber
pub async fn subscribe(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(name): Path<String>,
    payload: Result<Json<SubscriberRequest>, JsonRejection>,
) -> Result<RestResponse<SubscriptionHandle>, ApiError> {
    let Json(payload) = payload.map_err(|e| ctx.fail(BrokerError::unexpected(e.body_text())))?;
    state
        .broker
        .authorize(&payload.req_key, "subscribe", &name)
        .map_err(|e| ctx.fail(e))?;
    payload
        .validate()
        .map_err(|e| ctx.fail(BrokerError::unexpected(e)))?;
    let method = payload
        .delivery_method()
        .map_err(|e| ctx.fail(BrokerError::unexpected(e)))?;

    let handle = state
        .broker
        .subscribe(&name, &payload.req_key, &payload.url, method)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(RestResponse::success(handle))
}

/// DELETE /topic/{name}/subscriber/{handle}
pub async fn unsubscribe(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((name, handle)): Path<(String, String)>,
) -> Result<RestResponse<bool>, ApiError> {
    let removed = state
        .broker
        .unsubscribe(&name, &handle)
        .await
        .map_err(|e| ctx.fail(e))?;
    Ok(RestResponse::success(removed))
}
