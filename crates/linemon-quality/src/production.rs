use crate::analyzer::defect_rate;
use linemon_common::types::{round_to, AlertCounts, LineReading, LineStatus, ProductionMetrics};

/// Overall equipment effectiveness of one line, in percent.
///
/// Availability (uptime) × performance (efficiency) × quality (share of good
/// units; 1.0 before anything is produced).
pub fn line_oee(reading: &LineReading) -> f64 {
    let quality = if reading.products_produced == 0 {
        1.0
    } else {
        reading.products_produced.saturating_sub(reading.defects) as f64
            / reading.products_produced as f64
    };
    round_to(
        reading.uptime / 100.0 * (reading.efficiency / 100.0) * quality * 100.0,
        2,
    )
}

/// Plant-wide production figures, with alert counts taken from the ledger.
pub fn production_metrics(readings: &[LineReading], alerts: AlertCounts) -> ProductionMetrics {
    let total_output: u64 = readings.iter().map(|r| r.products_produced).sum();
    let total_defects: u64 = readings.iter().map(|r| r.defects).sum();

    let (average_efficiency, overall_oee) = if readings.is_empty() {
        (0.0, 0.0)
    } else {
        let n = readings.len() as f64;
        let avg_efficiency = readings.iter().map(|r| r.efficiency).sum::<f64>() / n;
        let avg_uptime = readings.iter().map(|r| r.uptime).sum::<f64>() / n;
        let quality_rate = 100.0 - defect_rate(total_defects, total_output);
        let oee = avg_uptime / 100.0 * (avg_efficiency / 100.0) * (quality_rate / 100.0) * 100.0;
        (avg_efficiency, oee)
    };

    ProductionMetrics {
        total_output,
        total_defects,
        overall_oee: round_to(overall_oee, 2),
        average_efficiency: round_to(average_efficiency, 2),
        active_lines: readings
            .iter()
            .filter(|r| r.status == LineStatus::Running)
            .count(),
        total_lines: readings.len(),
        critical_alerts: alerts.critical,
        warning_alerts: alerts.warning,
    }
}
