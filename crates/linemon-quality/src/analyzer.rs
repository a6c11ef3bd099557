use crate::error::Result;
use crate::trend::{TrendConfig, TrendTracker};
use linemon_common::types::{
    round_to, DefectCategory, DefectDistribution, LineReading, QualityMetrics,
};

/// Derives per-line quality figures and keeps each line's defect-rate trend.
pub struct QualityAnalyzer {
    tracker: TrendTracker,
}

impl QualityAnalyzer {
    pub fn new(config: TrendConfig) -> Result<Self> {
        Ok(Self {
            tracker: TrendTracker::new(config)?,
        })
    }

    pub fn tracker(&self) -> &TrendTracker {
        &self.tracker
    }

    /// Computes quality metrics for `reading`.
    ///
    /// Each call appends one sample to the line's trend history, so callers
    /// should analyze a line once per evaluation cycle.
    pub fn analyze(&self, reading: &LineReading) -> QualityMetrics {
        let total_inspected = reading.products_produced;
        let failed = reading.defects;
        let rate = defect_rate(failed, total_inspected);
        let trend = self.tracker.record_and_classify(&reading.line_id, rate);

        QualityMetrics {
            line_id: reading.line_id.clone(),
            total_inspected,
            passed: total_inspected.saturating_sub(failed),
            failed,
            defect_rate: round_to(rate, 2),
            defect_types: defect_distribution(failed),
            quality_score: quality_score(rate),
            trend,
        }
    }
}

/// Defective share of inspected units, in percent. Zero when nothing was
/// inspected.
pub fn defect_rate(failed: u64, inspected: u64) -> f64 {
    if inspected == 0 {
        return 0.0;
    }
    failed as f64 / inspected as f64 * 100.0
}

/// `100 − 10 × defect_rate`, floored at 0 and rounded to two decimals.
pub fn quality_score(defect_rate: f64) -> f64 {
    round_to((100.0 - defect_rate * 10.0).max(0.0), 2)
}

/// Splits `failed` across the fixed defect categories by weight.
///
/// Every category but the last is truncated to an integer; the last one
/// takes whatever remains, so the counts always sum to `failed`.
pub fn defect_distribution(failed: u64) -> DefectDistribution {
    let [leading @ .., last] = DefectCategory::ALL;

    let mut distribution = DefectDistribution::new();
    let mut assigned = 0u64;
    for category in leading {
        let count = (failed as f64 * category.weight()) as u64;
        distribution.insert(category, count);
        assigned += count;
    }
    distribution.insert(last, failed.saturating_sub(assigned));
    distribution
}
