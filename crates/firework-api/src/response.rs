//! API Response wrapper

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use firework_shared::{now_millis, EpochMillis};

/// Envelope around every response body, success or failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct RestResponse<T> {
    pub success: bool,
    pub payload: T,
    pub timestamp: EpochMillis,
}

impl<T: Serialize> RestResponse<T> {
    pub fn success(payload: T) -> Self {
        Self {
            success: true,
            payload,
            timestamp: now_millis(),
        }
    }

    pub fn failure(payload: T) -> Self {
        Self {
            success: false,
            payload,
            timestamp: now_millis(),
        }
    }
}

impl<T: Serialize> IntoResponse for RestResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
