use crate::api::{not_found, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

async fn all_machine_health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let health = state.snapshot().report.health.clone();
    success_response(StatusCode::OK, &trace_id, health)
}

/// Recomputed from the line's latest reading; assessment has no side effects.
async fn line_machine_health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(line_id): Path<String>,
) -> Response {
    let health = state
        .snapshot()
        .reading(&line_id)
        .map(|reading| state.engine.assess_health(reading));
    match health {
        Some(health) => success_response(StatusCode::OK, &trace_id, health),
        None => not_found(&trace_id, "Line not found"),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/machine-health", get(all_machine_health))
        .route("/v1/machine-health/{line_id}", get(line_machine_health))
}
