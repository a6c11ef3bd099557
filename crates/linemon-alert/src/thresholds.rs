//! Warning/critical bounds for every monitored metric.

use crate::error::{ConfigError, Result};
use linemon_common::types::DimensionStatus;
use serde::{Deserialize, Serialize};

/// One-sided bound where higher readings are worse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpperBound {
    pub warning: f64,
    pub critical: f64,
}

impl UpperBound {
    pub fn classify(&self, value: f64) -> DimensionStatus {
        if value >= self.critical {
            DimensionStatus::Critical
        } else if value >= self.warning {
            DimensionStatus::Warning
        } else {
            DimensionStatus::Normal
        }
    }

    fn validate(&self, metric: &'static str) -> Result<()> {
        ensure_finite(metric, &[self.warning, self.critical])?;
        if self.warning >= self.critical {
            return Err(ConfigError::InvalidThreshold {
                metric,
                reason: format!(
                    "warning ({}) must be below critical ({})",
                    self.warning, self.critical
                ),
            });
        }
        Ok(())
    }
}

/// One-sided bound where lower readings are worse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowerBound {
    pub warning: f64,
    pub critical: f64,
}

impl LowerBound {
    pub fn classify(&self, value: f64) -> DimensionStatus {
        if value <= self.critical {
            DimensionStatus::Critical
        } else if value <= self.warning {
            DimensionStatus::Warning
        } else {
            DimensionStatus::Normal
        }
    }

    fn validate(&self, metric: &'static str) -> Result<()> {
        ensure_finite(metric, &[self.warning, self.critical])?;
        if self.warning <= self.critical {
            return Err(ConfigError::InvalidThreshold {
                metric,
                reason: format!(
                    "warning ({}) must be above critical ({})",
                    self.warning, self.critical
                ),
            });
        }
        Ok(())
    }
}

/// Two-sided band: readings are safe strictly inside the warning band and
/// trigger at or beyond either edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandBound {
    pub warning_low: f64,
    pub warning_high: f64,
    pub critical_low: f64,
    pub critical_high: f64,
}

impl BandBound {
    pub fn classify(&self, value: f64) -> DimensionStatus {
        if value <= self.critical_low || value >= self.critical_high {
            DimensionStatus::Critical
        } else if value <= self.warning_low || value >= self.warning_high {
            DimensionStatus::Warning
        } else {
            DimensionStatus::Normal
        }
    }

    fn validate(&self, metric: &'static str) -> Result<()> {
        ensure_finite(
            metric,
            &[
                self.critical_low,
                self.warning_low,
                self.warning_high,
                self.critical_high,
            ],
        )?;
        let ordered = self.critical_low < self.warning_low
            && self.warning_low < self.warning_high
            && self.warning_high < self.critical_high;
        if !ordered {
            return Err(ConfigError::InvalidThreshold {
                metric,
                reason: format!(
                    "expected critical_low < warning_low < warning_high < critical_high, got {} / {} / {} / {}",
                    self.critical_low, self.warning_low, self.warning_high, self.critical_high
                ),
            });
        }
        Ok(())
    }
}

fn ensure_finite(metric: &'static str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold {
            metric,
            reason: "bounds must be finite numbers".to_string(),
        })
    }
}

/// The threshold table consulted by the rule evaluator and health assessment.
///
/// Never mutated by the engine; build a new engine to change it.
///
/// # Examples
///
/// ```
/// use linemon_alert::thresholds::Thresholds;
/// use linemon_common::types::DimensionStatus;
///
/// let t = Thresholds::default();
/// assert!(t.validate().is_ok());
/// assert_eq!(t.temperature.classify(40.0), DimensionStatus::Warning);
/// assert_eq!(t.efficiency.classify(60.0), DimensionStatus::Critical);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_temperature")]
    pub temperature: UpperBound,
    #[serde(default = "default_pressure")]
    pub pressure: BandBound,
    #[serde(default = "default_vibration")]
    pub vibration: UpperBound,
    #[serde(default = "default_efficiency")]
    pub efficiency: LowerBound,
    #[serde(default = "default_defect_rate")]
    pub defect_rate: UpperBound,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            pressure: default_pressure(),
            vibration: default_vibration(),
            efficiency: default_efficiency(),
            defect_rate: default_defect_rate(),
        }
    }
}

fn default_temperature() -> UpperBound {
    UpperBound {
        warning: 38.0,
        critical: 42.0,
    }
}

fn default_pressure() -> BandBound {
    BandBound {
        warning_low: 5.2,
        warning_high: 6.8,
        critical_low: 5.0,
        critical_high: 7.0,
    }
}

fn default_vibration() -> UpperBound {
    UpperBound {
        warning: 3.0,
        critical: 3.5,
    }
}

fn default_efficiency() -> LowerBound {
    LowerBound {
        warning: 75.0,
        critical: 65.0,
    }
}

fn default_defect_rate() -> UpperBound {
    UpperBound {
        warning: 5.0,
        critical: 8.0,
    }
}

impl Thresholds {
    /// Rejects tables where a warning bound is not strictly less severe than
    /// its critical bound, or where any bound is not finite.
    pub fn validate(&self) -> Result<()> {
        self.temperature.validate("temperature")?;
        self.pressure.validate("pressure")?;
        self.vibration.validate("vibration")?;
        self.efficiency.validate("efficiency")?;
        self.defect_rate.validate("defect_rate")?;
        Ok(())
    }
}
