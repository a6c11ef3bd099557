use crate::id::AlertId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operating state reported by a production line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    Running,
    Idle,
    Maintenance,
    Error,
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineStatus::Running => write!(f, "running"),
            LineStatus::Idle => write!(f, "idle"),
            LineStatus::Maintenance => write!(f, "maintenance"),
            LineStatus::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for LineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" => Ok(LineStatus::Running),
            "idle" => Ok(LineStatus::Idle),
            "maintenance" => Ok(LineStatus::Maintenance),
            "error" => Ok(LineStatus::Error),
            _ => Err(format!("unknown line status: {s}")),
        }
    }
}

/// One telemetry snapshot for a single production line.
///
/// Produced by a telemetry source once per cycle; the evaluation engine only
/// ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineReading {
    pub line_id: String,
    /// Display name (e.g. "Assembly Line A1")
    pub name: String,
    pub status: LineStatus,
    /// Units per minute
    pub current_speed: f64,
    pub target_speed: f64,
    /// Percent
    pub efficiency: f64,
    /// Percent
    pub uptime: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Bar
    pub pressure: f64,
    /// mm/s
    pub vibration: f64,
    /// Cumulative units produced
    pub products_produced: u64,
    /// Cumulative defective units
    pub defects: u64,
    pub last_maintenance: NaiveDate,
}

/// Alert severity level, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use linemon_common::types::Severity;
///
/// let sev: Severity = "warning".parse().unwrap();
/// assert_eq!(sev, Severity::Warning);
/// assert_eq!(sev.to_string(), "warning");
/// assert!(Severity::Critical > Severity::Info);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// An alert produced by the rule evaluator that has not yet been given an
/// identity by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDraft {
    pub line_id: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl AlertDraft {
    pub fn new(
        line_id: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line_id: line_id.into(),
            severity,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub line_id: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub acknowledged: bool,
    pub resolved: bool,
}

impl Alert {
    pub fn from_draft(id: AlertId, draft: AlertDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            line_id: draft.line_id,
            severity: draft.severity,
            title: draft.title,
            message: draft.message,
            timestamp,
            acknowledged: false,
            resolved: false,
        }
    }
}

/// Active alert counts keyed by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl AlertCounts {
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }
}

/// Classification of a single monitored dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionStatus {
    Normal,
    Warning,
    Critical,
}

impl std::fmt::Display for DimensionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimensionStatus::Normal => write!(f, "normal"),
            DimensionStatus::Warning => write!(f, "warning"),
            DimensionStatus::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineHealth {
    pub line_id: String,
    /// 0–100, one decimal
    pub health_score: f64,
    pub temperature_status: DimensionStatus,
    pub pressure_status: DimensionStatus,
    pub vibration_status: DimensionStatus,
    /// Hours until maintenance is advisable, never below 24
    pub predicted_maintenance_hours: u32,
    /// Never empty
    pub recommendations: Vec<String>,
}

/// Direction of a line's recent defect-rate movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Improving,
    Stable,
    Declining,
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendLabel::Improving => write!(f, "improving"),
            TrendLabel::Stable => write!(f, "stable"),
            TrendLabel::Declining => write!(f, "declining"),
        }
    }
}

/// Fixed defect categories, in distribution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectCategory {
    DimensionalError,
    SurfaceDefect,
    AssemblyError,
    MaterialDefect,
    PackagingError,
}

impl DefectCategory {
    pub const ALL: [DefectCategory; 5] = [
        DefectCategory::DimensionalError,
        DefectCategory::SurfaceDefect,
        DefectCategory::AssemblyError,
        DefectCategory::MaterialDefect,
        DefectCategory::PackagingError,
    ];

    /// Share of all defects attributed to this category. The weights of
    /// [`DefectCategory::ALL`] sum to 1.0.
    pub fn weight(self) -> f64 {
        match self {
            DefectCategory::DimensionalError => 0.35,
            DefectCategory::SurfaceDefect => 0.25,
            DefectCategory::AssemblyError => 0.20,
            DefectCategory::MaterialDefect => 0.15,
            DefectCategory::PackagingError => 0.05,
        }
    }
}

pub type DefectDistribution = BTreeMap<DefectCategory, u64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub line_id: String,
    pub total_inspected: u64,
    pub passed: u64,
    pub failed: u64,
    /// Percent, two decimals
    pub defect_rate: f64,
    pub defect_types: DefectDistribution,
    /// 0–100, two decimals
    pub quality_score: f64,
    pub trend: TrendLabel,
}

/// Aggregate of all lines' [`QualityMetrics`] for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub total_inspected: u64,
    pub total_passed: u64,
    pub total_failed: u64,
    pub overall_defect_rate: f64,
    pub average_quality_score: f64,
    pub defect_distribution: DefectDistribution,
    /// Lines whose defect rate exceeds the issue threshold
    pub lines_with_issues: usize,
}

/// Plant-wide production figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionMetrics {
    pub total_output: u64,
    pub total_defects: u64,
    pub overall_oee: f64,
    pub average_efficiency: f64,
    pub active_lines: usize,
    pub total_lines: usize,
    pub critical_alerts: usize,
    pub warning_alerts: usize,
}

/// Round `value` to `places` decimal places.
///
/// # Examples
///
/// ```
/// use linemon_common::types::round_to;
///
/// assert_eq!(round_to(70.04, 1), 70.0);
/// assert_eq!(round_to(1.23456, 2), 1.23);
/// ```
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
