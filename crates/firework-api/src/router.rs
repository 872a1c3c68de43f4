// ============================================================================
// Firework API - Router
// File: crates/firework-api/src/router.rs
// ============================================================================

use std::any::Any;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use firework_core::error::BrokerError;
use firework_shared::constants::MAX_PUBLISH_BODY_BYTES;

use crate::error::RequestContext;
use crate::handlers;
use crate::state::AppState;

/// Marks a response produced by the panic handler so the outer middleware
/// can render it with the request's method and path.
#[derive(Debug, Clone)]
struct HandlerPanicked(String);

pub fn build_router(state: AppState) -> Router {
    let topic_routes = Router::new()
        .route("/topic", get(handlers::topic::list_topics))
        .route(
            "/topic/{name}",
            get(handlers::topic::get_topic)
                .post(handlers::topic::publish)
                .put(handlers::topic::create_topic),
        )
        .route("/topic/{name}/subscriber", post(handlers::subscriber::subscribe))
        .route(
            "/topic/{name}/subscriber/{handle}",
            delete(handlers::subscriber::unsubscribe),
        );

    let health_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    let router = Router::new()
        .merge(topic_routes)
        .merge(health_routes)
        .with_state(state);

    with_middleware(router)
}

fn with_middleware(router: Router) -> Router {
    router
        .layer(DefaultBodyLimit::max(MAX_PUBLISH_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(render_panics))
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
    response.extensions_mut().insert(HandlerPanicked(detail));
    response
}

async fn render_panics(req: Request, next: Next) -> Response {
    let ctx = RequestContext {
        method: req.method().clone(),
        path: req.uri().path().to_string(),
    };

    let response = next.run(req).await;
    let panicked = response
        .extensions()
        .get::<HandlerPanicked>()
        .map(|p| p.0.clone());

    match panicked {
        Some(detail) => ctx
            .fail(BrokerError::unexpected(format!("panic: {}", detail)))
            .into_response(),
        None => response,
    }
}
