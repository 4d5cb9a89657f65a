//! Request handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use dashboard_application::{NoProgress, RequestScope, RunQueriesError};
use dashboard_domain::{OutputFormat, ResultSet};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::server::AppState;
use crate::output::console::ConsoleFormatter;

/// Run every registered query over the range in the request body.
///
/// The request scope is dropped together with this future, so a client that
/// disconnects cancels the batch.
pub async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let scope = RequestScope::with_timeout(state.request.timeout);
    let format = OutputFormat::from_accept(
        headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok()),
    );

    let outcome = match state
        .use_case
        .execute_request(&body, state.request.date_format, scope.token(), &NoProgress)
        .await
    {
        Ok(outcome) => outcome,
        Err(RunQueriesError::MalformedInput(e)) => {
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let response = render(&outcome.results, format);
    info!(
        keys = outcome.results.len(),
        cancelled = outcome.cancelled,
        format = format.as_str(),
        "Request took {:?}",
        started.elapsed()
    );
    response
}

fn render(results: &ResultSet, format: OutputFormat) -> Response {
    let content_type = match format {
        OutputFormat::Json => "application/json",
        OutputFormat::Text => "text/plain; charset=utf-8",
    };

    match ConsoleFormatter::render(results, format) {
        Ok(body) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            error!("Failed to render results: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render results").into_response()
        }
    }
}

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub count: usize,
    pub queries: Vec<String>,
}

/// List the registered queries
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let registry = state.use_case.registry();
    Json(HealthResponse {
        status: "ok",
        count: registry.len(),
        queries: registry.names().into_iter().map(str::to_string).collect(),
    })
}
