use crate::api::success_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use linemon_common::types::{
    Alert, AlertCounts, LineReading, MachineHealth, ProductionMetrics, QualityMetrics,
    QualitySummary,
};
use linemon_quality::production::production_metrics;
use serde::Serialize;

/// Everything a dashboard needs after one cycle, in a single payload.
#[derive(Serialize)]
struct SnapshotResponse {
    cycle: u64,
    updated_at: Option<DateTime<Utc>>,
    lines: Vec<LineReading>,
    overall_metrics: ProductionMetrics,
    quality_metrics: Vec<QualityMetrics>,
    quality_summary: QualitySummary,
    alerts: Vec<Alert>,
    alert_counts: AlertCounts,
    machine_health: Vec<MachineHealth>,
}

async fn snapshot(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let ledger = state.engine.ledger();
    let alerts = ledger.active_alerts();
    let alert_counts = ledger.counts_by_severity();

    let response = {
        let snapshot = state.snapshot();
        SnapshotResponse {
            cycle: snapshot.report.cycle,
            updated_at: snapshot.updated_at,
            lines: snapshot.readings.clone(),
            overall_metrics: production_metrics(&snapshot.readings, alert_counts),
            quality_metrics: snapshot.report.quality.clone(),
            quality_summary: snapshot.report.quality_summary.clone(),
            alerts,
            alert_counts,
            machine_health: snapshot.report.health.clone(),
        }
    };
    success_response(StatusCode::OK, &trace_id, response)
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/snapshot", get(snapshot))
}
