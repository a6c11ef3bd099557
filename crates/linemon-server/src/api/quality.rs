use crate::api::success_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

// Both endpoints read the last cycle's figures; querying never adds a trend
// sample.

async fn quality_metrics(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let metrics = state.snapshot().report.quality.clone();
    success_response(StatusCode::OK, &trace_id, metrics)
}

async fn quality_summary(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let summary = state.snapshot().report.quality_summary.clone();
    success_response(StatusCode::OK, &trace_id, summary)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/quality-metrics", get(quality_metrics))
        .route("/v1/quality-summary", get(quality_summary))
}
