use crate::state::AppState;
use linemon_alert::engine::CycleReport;
use linemon_collector::error::Result;
use linemon_collector::TelemetrySource;
use linemon_common::types::Severity;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Drives the recurring poll → evaluate → publish loop.
pub struct CycleScheduler {
    state: AppState,
    source: Box<dyn TelemetrySource>,
    interval_secs: u64,
}

impl CycleScheduler {
    pub fn new(state: AppState, source: Box<dyn TelemetrySource>, interval_secs: u64) -> Self {
        Self {
            state,
            source,
            interval_secs,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            source = self.source.name(),
            interval_secs = self.interval_secs,
            "Evaluation cycle scheduler started"
        );

        let mut tick = interval(Duration::from_secs(self.interval_secs));
        // A slow cycle pushes the next one back instead of bursting.
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            if let Err(e) = self.run_once() {
                tracing::error!(error = %e, source = self.source.name(), "Evaluation cycle failed");
            }
        }
    }

    /// Polls the source once, evaluates the readings and publishes the
    /// result. A failed poll leaves the previous snapshot in place.
    pub fn run_once(&mut self) -> Result<CycleReport> {
        let readings = self.source.poll()?;
        let report = self.state.engine.run_cycle(&readings);

        let critical = report
            .new_alerts
            .iter()
            .filter(|a| a.severity == Severity::Critical)
            .count();
        tracing::debug!(
            cycle = report.cycle,
            lines = readings.len(),
            new_alerts = report.new_alerts.len(),
            critical,
            "Cycle published"
        );

        self.state.publish(readings, report.clone());
        Ok(report)
    }
}
