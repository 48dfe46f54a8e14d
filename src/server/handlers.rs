// file: src/server/handlers.rs
// description: HTTP request handlers for the query endpoints
// reference: https://docs.rs/axum

use crate::error::ServerError;
use crate::models::{ErrorResponse, QueryRequest, QueryResponse};
use crate::pipeline::QueryPipeline;
use crate::utils::{HealthReport, QUERY_NOT_PROVIDED, Validator};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info_span};
use uuid::Uuid;

pub const WELCOME_MESSAGE: &str = "Welcome to the Llama Server!";
pub const QUERY_FAILED: &str = "An error occurred while processing the query.";

pub struct AppState {
    pub pipeline: QueryPipeline,
}

impl AppState {
    pub fn new(pipeline: QueryPipeline) -> Self {
        Self { pipeline }
    }
}

pub type SharedState = Arc<AppState>;

/// Maps pipeline errors onto the two failure responses clients can see.
pub struct ApiError(ServerError);

impl From<ServerError> for ApiError {
    fn from(err: ServerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_client_error() {
            debug!("Rejected request: {}", self.0);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(QUERY_NOT_PROVIDED)),
            )
                .into_response();
        }

        error!("Query failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(QUERY_FAILED)),
        )
            .into_response()
    }
}

pub async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// Bodies that are missing or not JSON are treated like a body without a query.
pub async fn query(
    State(state): State<SharedState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Unreadable query body: {}", rejection);
            QueryRequest::default()
        }
    };

    let query = Validator::validate_query(request.query_text())?;

    let request_id = Uuid::new_v4();
    let response = state
        .pipeline
        .answer(query)
        .instrument(info_span!("query", %request_id))
        .await?;

    Ok(Json(QueryResponse { response }))
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthReport> {
    Json(state.pipeline.health_report())
}
