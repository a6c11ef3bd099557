use crate::api::{not_found, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

/// Latest reading of every line.
async fn list_lines(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let readings = state.snapshot().readings.clone();
    success_response(StatusCode::OK, &trace_id, readings)
}

async fn get_line(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Response {
    let reading = state.snapshot().reading(&line_id).cloned();
    match reading {
        Some(reading) => success_response(StatusCode::OK, &trace_id, reading),
        None => not_found(&trace_id, "Line not found"),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/lines", get(list_lines))
        .route("/v1/lines/{line_id}", get(get_line))
}
