#![allow(dead_code)]

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use linemon_alert::engine::MonitorEngine;
use linemon_collector::error::CollectorError;
use linemon_collector::TelemetrySource;
use linemon_common::types::{LineReading, LineStatus};
use linemon_server::app;
use linemon_server::config::ServerConfig;
use linemon_server::cycle::CycleScheduler;
use linemon_server::state::AppState;
use serde_json::Value;
use tower::util::ServiceExt;

pub struct TestContext {
    pub state: AppState,
    pub app: axum::Router,
}

/// Replays a fixed set of readings on every poll.
pub struct FixedSource {
    pub readings: Vec<LineReading>,
}

impl TelemetrySource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    fn poll(&mut self) -> linemon_collector::error::Result<Vec<LineReading>> {
        Ok(self.readings.clone())
    }
}

pub struct FailingSource;

impl TelemetrySource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    fn poll(&mut self) -> linemon_collector::error::Result<Vec<LineReading>> {
        Err(CollectorError::Unavailable("feed offline".to_string()))
    }
}

pub fn make_reading(line_id: &str, name: &str) -> LineReading {
    LineReading {
        line_id: line_id.to_string(),
        name: name.to_string(),
        status: LineStatus::Running,
        current_speed: 110.0,
        target_speed: 120.0,
        efficiency: 90.0,
        uptime: 95.0,
        temperature: 30.0,
        pressure: 6.0,
        vibration: 1.0,
        products_produced: 1000,
        defects: 0,
        last_maintenance: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
    }
}

/// Two lines: LINE-A1 running hot (one critical temperature alert) and
/// LINE-B1 in maintenance (one info alert).
pub fn plant_readings() -> Vec<LineReading> {
    let mut hot = make_reading("LINE-A1", "Assembly Line A1");
    hot.temperature = 43.0;
    let mut maintenance = make_reading("LINE-B1", "Packaging Line B1");
    maintenance.status = LineStatus::Maintenance;
    maintenance.current_speed = 0.0;
    maintenance.products_produced = 2000;
    maintenance.defects = 40;
    vec![hot, maintenance]
}

pub fn build_test_context_with(config: ServerConfig) -> Result<TestContext> {
    let engine = MonitorEngine::new(config.engine_config())?;
    let state = AppState::new(engine, config);
    let app = app::build_http_app(state.clone());
    Ok(TestContext { state, app })
}

pub fn build_test_context() -> Result<TestContext> {
    build_test_context_with(ServerConfig::default())
}

pub fn scheduler(ctx: &TestContext, readings: Vec<LineReading>) -> CycleScheduler {
    CycleScheduler::new(ctx.state.clone(), Box::new(FixedSource { readings }), 3)
}

/// Context with one completed cycle over [`plant_readings`].
pub fn build_cycled_context() -> Result<TestContext> {
    let ctx = build_test_context()?;
    scheduler(&ctx, plant_readings()).run_once()?;
    Ok(ctx)
}

pub async fn request(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json, trace_id)
}

pub fn assert_ok_envelope(json: &Value) {
    assert_eq!(json["err_code"], 0);
    assert_eq!(json["err_msg"], "success");
    assert!(json["trace_id"].is_string());
}

pub fn assert_err_envelope(json: &Value, err_code: i32) {
    assert_eq!(json["err_code"], err_code);
    assert!(json["err_msg"].is_string());
    assert!(json.get("trace_id").is_some());
    assert!(json.get("data").is_some());
    assert!(json["data"].is_null());
}
