use crate::thresholds::Thresholds;
use crate::{LineRule, RuleContext};
use linemon_common::types::{AlertDraft, DimensionStatus, LineReading, QualityMetrics, Severity};
use std::str::FromStr;

/// A numeric metric with a warning and a critical bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Pressure,
    Vibration,
    Efficiency,
    DefectRate,
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(Self::Temperature),
            "pressure" => Ok(Self::Pressure),
            "vibration" => Ok(Self::Vibration),
            "efficiency" => Ok(Self::Efficiency),
            "defect_rate" => Ok(Self::DefectRate),
            _ => Err(format!("unknown metric: {s}")),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Vibration => "vibration",
            Self::Efficiency => "efficiency",
            Self::DefectRate => "defect_rate",
        }
    }

    pub fn value(self, reading: &LineReading, quality: &QualityMetrics) -> f64 {
        match self {
            Self::Temperature => reading.temperature,
            Self::Pressure => reading.pressure,
            Self::Vibration => reading.vibration,
            Self::Efficiency => reading.efficiency,
            Self::DefectRate => quality.defect_rate,
        }
    }

    pub fn classify(self, value: f64, thresholds: &Thresholds) -> DimensionStatus {
        match self {
            Self::Temperature => thresholds.temperature.classify(value),
            Self::Pressure => thresholds.pressure.classify(value),
            Self::Vibration => thresholds.vibration.classify(value),
            Self::Efficiency => thresholds.efficiency.classify(value),
            Self::DefectRate => thresholds.defect_rate.classify(value),
        }
    }

    fn title(self, severity: Severity) -> &'static str {
        match (self, severity) {
            (Self::Temperature, Severity::Critical) => "Critical Temperature",
            (Self::Temperature, _) => "High Temperature",
            (Self::Pressure, Severity::Critical) => "Critical Pressure",
            (Self::Pressure, _) => "Pressure Deviation",
            (Self::Vibration, Severity::Critical) => "Excessive Vibration",
            (Self::Vibration, _) => "High Vibration",
            (Self::Efficiency, Severity::Critical) => "Critical Efficiency Drop",
            (Self::Efficiency, _) => "Low Efficiency",
            (Self::DefectRate, Severity::Critical) => "Critical Defect Rate",
            (Self::DefectRate, _) => "High Defect Rate",
        }
    }

    fn message(self, severity: Severity, value: f64) -> String {
        let critical = severity == Severity::Critical;
        match self {
            Self::Temperature if critical => {
                format!("Temperature at {value:.1}°C exceeds critical threshold")
            }
            Self::Temperature => format!("Temperature at {value:.1}°C above normal range"),
            Self::Pressure if critical => {
                format!("Pressure at {value:.1} bar outside safe operating range")
            }
            Self::Pressure => format!("Pressure at {value:.1} bar deviating from optimal range"),
            Self::Vibration if critical => {
                format!("Vibration at {value:.1} mm/s indicates potential mechanical failure")
            }
            Self::Vibration => format!("Vibration at {value:.1} mm/s above normal levels"),
            Self::Efficiency if critical => {
                format!("Efficiency at {value:.1}% requires immediate attention")
            }
            Self::Efficiency => format!("Efficiency at {value:.1}% below target"),
            Self::DefectRate if critical => {
                format!("Defect rate at {value:.1}% exceeds acceptable limits")
            }
            Self::DefectRate => format!("Defect rate at {value:.1}% above target"),
        }
    }
}

/// Classifies one metric against its bounds, critical first.
///
/// A reading in the critical range yields only the critical draft, never an
/// additional warning for the same metric.
pub struct MetricRule {
    pub metric: Metric,
}

impl MetricRule {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }
}

impl LineRule for MetricRule {
    fn id(&self) -> &str {
        self.metric.as_str()
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<AlertDraft> {
        let value = self.metric.value(ctx.reading, ctx.quality);
        let severity = match self.metric.classify(value, ctx.thresholds) {
            DimensionStatus::Critical => Severity::Critical,
            DimensionStatus::Warning => Severity::Warning,
            DimensionStatus::Normal => return None,
        };

        Some(AlertDraft::new(
            &ctx.reading.line_id,
            severity,
            self.metric.title(severity),
            self.metric.message(severity, value),
        ))
    }
}
