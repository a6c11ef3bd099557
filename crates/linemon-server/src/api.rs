pub mod alerts;
pub mod analytics;
pub mod lines;
pub mod machine_health;
pub mod quality;
pub mod snapshot;

use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Uniform response envelope.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// 0 on success
    pub err_code: i32,
    pub err_msg: String,
    pub trace_id: String,
    pub data: Option<T>,
}

pub fn success_response<T>(status: StatusCode, trace_id: &str, data: T) -> Response
where
    T: Serialize,
{
    (
        status,
        Json(ApiResponse {
            err_code: 0,
            err_msg: "success".to_string(),
            trace_id: trace_id.to_string(),
            data: Some(data),
        }),
    )
        .into_response()
}

fn to_custom_error_code(code: &str) -> i32 {
    match code {
        "bad_request" => 1001,
        "not_found" => 1004,
        "internal_error" => 1500,
        _ => 1999,
    }
}

pub fn error_response(status: StatusCode, trace_id: &str, code: &str, msg: &str) -> Response {
    (
        status,
        Json(ApiResponse::<Value> {
            err_code: to_custom_error_code(code),
            err_msg: msg.to_string(),
            trace_id: trace_id.to_string(),
            data: None,
        }),
    )
        .into_response()
}

pub fn not_found(trace_id: &str, msg: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, trace_id, "not_found", msg)
}

#[derive(Serialize)]
struct HealthResponse {
    version: String,
    uptime_secs: i64,
    cycles_completed: u64,
    line_count: usize,
    last_cycle_at: Option<DateTime<Utc>>,
}

async fn health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let uptime = (Utc::now() - state.start_time).num_seconds();
    let (line_count, last_cycle_at) = {
        let snapshot = state.snapshot();
        (snapshot.readings.len(), snapshot.updated_at)
    };
    success_response(
        StatusCode::OK,
        &trace_id,
        HealthResponse {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: uptime,
            cycles_completed: state.engine.cycles_completed(),
            line_count,
            last_cycle_at,
        },
    )
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/health", get(health))
        .merge(lines::routes())
        .merge(quality::routes())
        .merge(alerts::routes())
        .merge(machine_health::routes())
        .merge(analytics::routes())
        .merge(snapshot::routes())
}
