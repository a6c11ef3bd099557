use crate::error::{ConfigError, Result};
use crate::evaluator::RuleEvaluator;
use crate::health::assess_health;
use crate::ledger::{AlertLedger, DEFAULT_RETENTION};
use crate::thresholds::Thresholds;
use linemon_common::types::{
    Alert, LineReading, MachineHealth, QualityMetrics, QualitySummary, Severity,
};
use linemon_quality::analyzer::QualityAnalyzer;
use linemon_quality::summary::summarize;
use linemon_quality::trend::TrendConfig;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Settings needed to build a [`MonitorEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub thresholds: Thresholds,
    pub trend: TrendConfig,
    pub alert_retention: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            trend: TrendConfig::default(),
            alert_retention: DEFAULT_RETENTION,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.trend.validate()?;
        if self.alert_retention == 0 {
            return Err(ConfigError::ZeroRetention);
        }
        Ok(())
    }
}

/// Outcome of one evaluation cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    /// Alerts recorded this cycle, in evaluation order
    pub new_alerts: Vec<Alert>,
    pub quality: Vec<QualityMetrics>,
    pub health: Vec<MachineHealth>,
    pub quality_summary: QualitySummary,
}

/// Owns all evaluation state: the threshold table, per-line trend history,
/// and the alert ledger.
pub struct MonitorEngine {
    thresholds: Thresholds,
    evaluator: RuleEvaluator,
    quality: QualityAnalyzer,
    ledger: AlertLedger,
    cycles: AtomicU64,
    cycle_guard: Mutex<()>,
}

impl MonitorEngine {
    /// Validates `config` and builds an engine with the standard rule set.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_evaluator(config, RuleEvaluator::standard())
    }

    pub fn with_evaluator(config: EngineConfig, evaluator: RuleEvaluator) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            thresholds: config.thresholds,
            evaluator,
            quality: QualityAnalyzer::new(config.trend)?,
            ledger: AlertLedger::new(config.alert_retention),
            cycles: AtomicU64::new(0),
            cycle_guard: Mutex::new(()),
        })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    pub fn quality_analyzer(&self) -> &QualityAnalyzer {
        &self.quality
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Runs one full evaluation pass over `readings`.
    ///
    /// Lines are processed in input order: quality analysis (one trend
    /// sample per line), rule evaluation, health assessment, then the line's
    /// drafts go into the ledger as one batch. Concurrent callers are
    /// serialized so cycles never interleave.
    pub fn run_cycle(&self, readings: &[LineReading]) -> CycleReport {
        let _guard = self
            .cycle_guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut new_alerts = Vec::new();
        let mut quality = Vec::with_capacity(readings.len());
        let mut health = Vec::with_capacity(readings.len());

        for reading in readings {
            let metrics = self.quality.analyze(reading);
            let drafts = self
                .evaluator
                .evaluate(reading, &metrics, &self.thresholds);
            let recorded = self.ledger.record_batch(drafts);

            for alert in recorded.iter().filter(|a| a.severity == Severity::Critical) {
                tracing::warn!(
                    alert_id = %alert.id,
                    line_id = %alert.line_id,
                    title = %alert.title,
                    "Critical alert raised"
                );
            }

            new_alerts.extend(recorded);
            health.push(assess_health(reading, &self.thresholds));
            quality.push(metrics);
        }

        let quality_summary = summarize(&quality);
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;

        tracing::debug!(
            cycle,
            lines = readings.len(),
            new_alerts = new_alerts.len(),
            retained = self.ledger.len(),
            "Evaluation cycle complete"
        );

        CycleReport {
            cycle,
            new_alerts,
            quality,
            health,
            quality_summary,
        }
    }

    /// On-demand health assessment; does not touch any engine state.
    pub fn assess_health(&self, reading: &LineReading) -> MachineHealth {
        assess_health(reading, &self.thresholds)
    }
}
