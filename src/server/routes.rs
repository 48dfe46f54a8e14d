// file: src/server/routes.rs
// description: API routes and middleware stack
// reference: https://docs.rs/tower-http

use crate::server::handlers::{self, SharedState};
use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/query", post(handlers::query))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Router with permissive CORS and request tracing.
pub fn create_router_with_middleware(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}
