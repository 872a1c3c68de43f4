// ============================================================================
// Firework API - Error Responses
// File: crates/firework-api/src/error.rs
// ============================================================================
//! Mapping of broker errors to status codes and error envelopes.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use firework_core::error::{BrokerError, ErrorKind};

use crate::response::RestResponse;

/// Wire representation of one error kind.
#[derive(Debug)]
pub struct ErrorSpec {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub code: &'static str,
    pub message: &'static str,
}

static UNEXPECTED: ErrorSpec = ErrorSpec {
    kind: ErrorKind::Unexpected,
    status: StatusCode::INTERNAL_SERVER_ERROR,
    code: "00000",
    message: "INTERNAL_SERVER_ERROR",
};

static ERROR_TABLE: [ErrorSpec; 5] = [
    ErrorSpec {
        kind: ErrorKind::NotFound,
        status: StatusCode::BAD_REQUEST,
        code: "00002",
        message: "request does not exists",
    },
    ErrorSpec {
        kind: ErrorKind::InvalidRequestKey,
        status: StatusCode::BAD_REQUEST,
        code: "00003",
        message: "you sent the invalid request key",
    },
    ErrorSpec {
        kind: ErrorKind::DuplicateSubscription,
        status: StatusCode::BAD_REQUEST,
        code: "00004",
        message: "the requested url was already subscribed",
    },
    ErrorSpec {
        kind: ErrorKind::InvalidSubscriptionHandle,
        status: StatusCode::BAD_REQUEST,
        code: "00005",
        message: "you sent the invalid subscribe key",
    },
    ErrorSpec {
        kind: ErrorKind::InvalidTopicName,
        status: StatusCode::BAD_REQUEST,
        code: "00006",
        message: "the requested topic name is invalid",
    },
];

impl ErrorSpec {
    pub fn of(kind: ErrorKind) -> &'static ErrorSpec {
        ERROR_TABLE
            .iter()
            .find(|spec| spec.kind == kind)
            .unwrap_or(&UNEXPECTED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub method: String,
    pub path: String,
}

/// Method and path of the request being served, echoed in error envelopes.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
}

impl RequestContext {
    pub fn fail(&self, error: BrokerError) -> ApiError {
        ApiError {
            error,
            method: self.method.clone(),
            path: self.path.clone(),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
        })
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub error: BrokerError,
    pub method: Method,
    pub path: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let spec = ErrorSpec::of(self.error.kind());

        if spec.status.is_server_error() {
            tracing::error!("{} {} failed: {}", self.method, self.path, self.error);
        } else {
            tracing::warn!("{} {} rejected: {}", self.method, self.path, self.error);
        }

        let body = RestResponse::failure(ErrorPayload {
            code: spec.code.to_string(),
            message: spec.message.to_string(),
            method: self.method.to_string(),
            path: self.path,
        });

        (spec.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_an_entry() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorSpec::of(kind).kind, kind);
        }
    }

    #[test]
    fn test_only_unexpected_is_a_server_error() {
        for kind in ErrorKind::ALL {
            let spec = ErrorSpec::of(kind);
            assert_eq!(
                spec.status.is_server_error(),
                kind == ErrorKind::Unexpected,
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn test_codes_are_distinct() {
        let mut codes: Vec<_> = ErrorKind::ALL.iter().map(|k| ErrorSpec::of(*k).code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn test_unexpected_maps_to_internal_server_error() {
        let response = ApiError {
            error: BrokerError::unexpected("database password is hunter2"),
            method: Method::POST,
            path: "/topic/NEWS".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
