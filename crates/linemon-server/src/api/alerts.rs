use crate::api::{not_found, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use linemon_common::id::AlertId;
use serde::Serialize;

#[derive(Serialize)]
struct AlertCountsResponse {
    critical: usize,
    warning: usize,
    info: usize,
    total: usize,
}

#[derive(Serialize)]
struct AlertStatusResponse {
    id: AlertId,
    status: &'static str,
}

/// Unresolved alerts, oldest first.
async fn active_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    success_response(
        StatusCode::OK,
        &trace_id,
        state.engine.ledger().active_alerts(),
    )
}

async fn alert_counts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let counts = state.engine.ledger().counts_by_severity();
    success_response(
        StatusCode::OK,
        &trace_id,
        AlertCountsResponse {
            critical: counts.critical,
            warning: counts.warning,
            info: counts.info,
            total: counts.total(),
        },
    )
}

/// Malformed ids are reported the same way as unknown ones.
fn update_alert(
    state: &AppState,
    trace_id: &str,
    raw_id: &str,
    status: &'static str,
    update: impl FnOnce(AlertId) -> bool,
) -> Response {
    let Ok(id) = raw_id.parse::<AlertId>() else {
        return not_found(trace_id, "Alert not found");
    };
    if !update(id) {
        return not_found(trace_id, "Alert not found");
    }
    tracing::info!(alert_id = %id, status, retained = state.engine.ledger().len(), "Alert updated");
    success_response(StatusCode::OK, trace_id, AlertStatusResponse { id, status })
}

async fn acknowledge_alert(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let ledger = state.engine.ledger();
    update_alert(&state, &trace_id, &id, "acknowledged", |id| {
        ledger.acknowledge(id)
    })
}

async fn resolve_alert(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let ledger = state.engine.ledger();
    update_alert(&state, &trace_id, &id, "resolved", |id| ledger.resolve(id))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/alerts", get(active_alerts))
        .route("/v1/alerts/counts", get(alert_counts))
        .route("/v1/alerts/{id}/acknowledge", post(acknowledge_alert))
        .route("/v1/alerts/{id}/resolve", post(resolve_alert))
}
