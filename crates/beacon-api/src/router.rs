//! Route definitions for the Beacon HTTP API.
//!
//! The authenticated pull API lives under `/api/notification/v1`; the health
//! probe is unauthenticated at the root.

use axum::Router;
use axum::http::{HeaderName, Method, header};
use axum::routing::{delete, get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
        .route(
            "/notifications/read-all",
            post(handlers::notification::mark_all_read),
        )
        .route("/notifications/{id}", delete(handlers::notification::delete))
        .route("/notifications/stream", get(handlers::stream::stream));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/notification/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
        .with_state(state)
}

/// Permissive CORS: the gateway in front of the service pins origins.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-tenant-key"),
        ])
}
