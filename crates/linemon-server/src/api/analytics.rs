use crate::api::success_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use linemon_common::types::{LineReading, QualityMetrics};
use linemon_quality::production::{line_oee, production_metrics};
use serde::Serialize;

/// Efficiency every line is measured against in the analytics view.
pub const EFFICIENCY_TARGET: f64 = 90.0;

#[derive(Debug, Serialize)]
pub struct LineOutput {
    pub line_id: String,
    pub name: String,
    pub output: u64,
    pub defects: u64,
    pub efficiency: f64,
}

#[derive(Debug, Serialize)]
pub struct EfficiencyTrend {
    pub line_id: String,
    pub current_efficiency: f64,
    pub target: f64,
    pub oee: f64,
}

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub production_by_line: Vec<LineOutput>,
    pub efficiency_trends: Vec<EfficiencyTrend>,
    pub quality_by_line: Vec<QualityMetrics>,
}

pub fn build_analytics(readings: &[LineReading], quality: &[QualityMetrics]) -> Analytics {
    Analytics {
        production_by_line: readings
            .iter()
            .map(|r| LineOutput {
                line_id: r.line_id.clone(),
                name: r.name.clone(),
                output: r.products_produced,
                defects: r.defects,
                efficiency: r.efficiency,
            })
            .collect(),
        efficiency_trends: readings
            .iter()
            .map(|r| EfficiencyTrend {
                line_id: r.line_id.clone(),
                current_efficiency: r.efficiency,
                target: EFFICIENCY_TARGET,
                oee: line_oee(r),
            })
            .collect(),
        quality_by_line: quality.to_vec(),
    }
}

/// Plant-wide output, OEE and open alert counts.
async fn overall_metrics(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let counts = state.engine.ledger().counts_by_severity();
    let metrics = production_metrics(&state.snapshot().readings, counts);
    success_response(StatusCode::OK, &trace_id, metrics)
}

async fn analytics(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let analytics = {
        let snapshot = state.snapshot();
        build_analytics(&snapshot.readings, &snapshot.report.quality)
    };
    success_response(StatusCode::OK, &trace_id, analytics)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/overall-metrics", get(overall_metrics))
        .route("/v1/analytics", get(analytics))
}
