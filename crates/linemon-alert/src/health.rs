use crate::thresholds::Thresholds;
use linemon_common::types::{round_to, DimensionStatus, LineReading, MachineHealth};

/// Efficiency below this costs health points regardless of alert thresholds.
pub const HEALTH_EFFICIENCY_FLOOR: f64 = 80.0;

/// Lower bound on predicted hours until maintenance.
pub const MIN_MAINTENANCE_HOURS: u32 = 24;

const ALL_NORMAL: &str = "All systems operating normally";

struct Penalty {
    points: f64,
    recommendation: &'static str,
}

struct DimensionPenalties {
    warning: Penalty,
    critical: Penalty,
}

const TEMPERATURE: DimensionPenalties = DimensionPenalties {
    warning: Penalty {
        points: 10.0,
        recommendation: "Monitor cooling system",
    },
    critical: Penalty {
        points: 30.0,
        recommendation: "Immediate cooling system inspection required",
    },
};

const PRESSURE: DimensionPenalties = DimensionPenalties {
    warning: Penalty {
        points: 10.0,
        recommendation: "Pressure calibration recommended",
    },
    critical: Penalty {
        points: 30.0,
        recommendation: "Critical pressure adjustment needed",
    },
};

const VIBRATION: DimensionPenalties = DimensionPenalties {
    warning: Penalty {
        points: 15.0,
        recommendation: "Schedule bearing inspection",
    },
    critical: Penalty {
        points: 35.0,
        recommendation: "Immediate mechanical inspection required",
    },
};

const LOW_EFFICIENCY: Penalty = Penalty {
    points: 10.0,
    recommendation: "Performance optimization needed",
};

/// Scores a line's mechanical health from its current reading.
///
/// Starts at 100 and subtracts a fixed penalty for every dimension in warning
/// or critical state, plus a flat penalty for efficiency under
/// [`HEALTH_EFFICIENCY_FLOOR`]. Each penalty contributes one recommendation.
pub fn assess_health(reading: &LineReading, thresholds: &Thresholds) -> MachineHealth {
    let mut score = 100.0;
    let mut recommendations = Vec::new();

    let mut apply = |status: DimensionStatus, penalties: &DimensionPenalties| {
        let penalty = match status {
            DimensionStatus::Critical => &penalties.critical,
            DimensionStatus::Warning => &penalties.warning,
            DimensionStatus::Normal => return,
        };
        score -= penalty.points;
        recommendations.push(penalty.recommendation.to_string());
    };

    let temperature_status = thresholds.temperature.classify(reading.temperature);
    apply(temperature_status, &TEMPERATURE);
    let pressure_status = thresholds.pressure.classify(reading.pressure);
    apply(pressure_status, &PRESSURE);
    let vibration_status = thresholds.vibration.classify(reading.vibration);
    apply(vibration_status, &VIBRATION);

    if reading.efficiency < HEALTH_EFFICIENCY_FLOOR {
        score -= LOW_EFFICIENCY.points;
        recommendations.push(LOW_EFFICIENCY.recommendation.to_string());
    }

    if recommendations.is_empty() {
        recommendations.push(ALL_NORMAL.to_string());
    }

    let health_score = round_to(f64::max(score, 0.0), 1);

    MachineHealth {
        line_id: reading.line_id.clone(),
        health_score,
        temperature_status,
        pressure_status,
        vibration_status,
        predicted_maintenance_hours: predict_maintenance_hours(health_score),
        recommendations,
    }
}

/// Hours until maintenance: `200 − 10 × (100 − score)`, truncated, never
/// below [`MIN_MAINTENANCE_HOURS`].
///
/// A fixed linear heuristic, not a forecast. A perfect score gives 200
/// hours and every lost point takes ten hours off.
pub fn predict_maintenance_hours(health_score: f64) -> u32 {
    let hours = (200.0 - (100.0 - health_score) * 10.0) as i64;
    hours.max(i64::from(MIN_MAINTENANCE_HOURS)) as u32
}
