use crate::analyzer::defect_rate;
use linemon_common::types::{round_to, QualityMetrics, QualitySummary};

/// Defect rate (percent) above which a line counts as having quality issues.
pub const ISSUE_DEFECT_RATE: f64 = 5.0;

/// Aggregates per-line quality metrics into a plant-wide summary.
///
/// Distributions are merged category by category. An empty input yields an
/// all-zero summary.
pub fn summarize(metrics: &[QualityMetrics]) -> QualitySummary {
    let total_inspected: u64 = metrics.iter().map(|m| m.total_inspected).sum();
    let total_failed: u64 = metrics.iter().map(|m| m.failed).sum();

    let average_quality_score = if metrics.is_empty() {
        0.0
    } else {
        metrics.iter().map(|m| m.quality_score).sum::<f64>() / metrics.len() as f64
    };

    let mut summary = QualitySummary {
        total_inspected,
        total_passed: total_inspected.saturating_sub(total_failed),
        total_failed,
        overall_defect_rate: round_to(defect_rate(total_failed, total_inspected), 2),
        average_quality_score: round_to(average_quality_score, 2),
        lines_with_issues: metrics
            .iter()
            .filter(|m| m.defect_rate > ISSUE_DEFECT_RATE)
            .count(),
        ..Default::default()
    };

    for m in metrics {
        for (category, count) in &m.defect_types {
            *summary.defect_distribution.entry(*category).or_insert(0) += count;
        }
    }

    summary
}
