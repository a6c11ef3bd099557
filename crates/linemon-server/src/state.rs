use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use linemon_alert::engine::{CycleReport, MonitorEngine};
use linemon_common::types::LineReading;
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Result of the most recent evaluation cycle, as served by the read
/// endpoints.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub readings: Vec<LineReading>,
    pub report: CycleReport,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn reading(&self, line_id: &str) -> Option<&LineReading> {
        self.readings.iter().find(|r| r.line_id == line_id)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MonitorEngine>,
    pub snapshot: Arc<RwLock<Snapshot>>,
    pub start_time: DateTime<Utc>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(engine: MonitorEngine, config: ServerConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
            start_time: Utc::now(),
            config: Arc::new(config),
        }
    }

    pub fn snapshot(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the served snapshot with the output of a finished cycle.
    pub fn publish(&self, readings: Vec<LineReading>, report: CycleReport) {
        let mut snapshot = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *snapshot = Snapshot {
            readings,
            report,
            updated_at: Some(Utc::now()),
        };
    }
}
