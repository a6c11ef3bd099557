use crate::engine::{EngineConfig, MonitorEngine};
use crate::error::ConfigError;
use crate::evaluator::{evaluate, RuleEvaluator};
use crate::health::{assess_health, predict_maintenance_hours};
use crate::ledger::AlertLedger;
use crate::rules::metric::{Metric, MetricRule};
use crate::rules::status::StatusRule;
use crate::thresholds::{BandBound, LowerBound, Thresholds, UpperBound};
use chrono::NaiveDate;
use linemon_common::id::AlertId;
use linemon_common::types::{
    AlertDraft, DefectDistribution, DimensionStatus, LineReading, LineStatus, QualityMetrics,
    Severity, TrendLabel,
};
use linemon_quality::trend::TrendConfig;

fn make_reading(line_id: &str) -> LineReading {
    LineReading {
        line_id: line_id.to_string(),
        name: format!("Assembly Line {line_id}"),
        status: LineStatus::Running,
        current_speed: 110.0,
        target_speed: 120.0,
        efficiency: 90.0,
        uptime: 97.0,
        temperature: 30.0,
        pressure: 6.0,
        vibration: 1.0,
        products_produced: 1000,
        defects: 0,
        last_maintenance: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    }
}

fn make_quality(line_id: &str, defect_rate: f64, trend: TrendLabel) -> QualityMetrics {
    QualityMetrics {
        line_id: line_id.to_string(),
        total_inspected: 1000,
        passed: 1000,
        failed: 0,
        defect_rate,
        defect_types: DefectDistribution::new(),
        quality_score: 100.0,
        trend,
    }
}

fn healthy_quality(line_id: &str) -> QualityMetrics {
    make_quality(line_id, 0.0, TrendLabel::Stable)
}

fn titles(drafts: &[AlertDraft]) -> Vec<&str> {
    drafts.iter().map(|d| d.title.as_str()).collect()
}

fn draft(line_id: &str, n: usize) -> AlertDraft {
    AlertDraft::new(line_id, Severity::Warning, format!("Alert {n}"), "test")
}

#[test]
fn normal_reading_produces_no_alerts() {
    let reading = make_reading("LINE-A1");
    let drafts = evaluate(&reading, &healthy_quality("LINE-A1"), &Thresholds::default());
    assert!(drafts.is_empty(), "unexpected alerts: {:?}", titles(&drafts));
}

#[test]
fn critical_metric_emits_only_critical_alert() {
    let thresholds = Thresholds::default();
    let quality = healthy_quality("LINE-A1");

    let cases: [(&str, fn(&mut LineReading)); 5] = [
        ("Critical Temperature", |r| r.temperature = 45.0),
        ("Critical Pressure", |r| r.pressure = 4.8),
        ("Critical Pressure", |r| r.pressure = 7.2),
        ("Excessive Vibration", |r| r.vibration = 3.9),
        ("Critical Efficiency Drop", |r| r.efficiency = 60.0),
    ];

    for (title, mutate) in cases {
        let mut reading = make_reading("LINE-A1");
        mutate(&mut reading);
        let drafts = evaluate(&reading, &quality, &thresholds);
        assert_eq!(drafts.len(), 1, "{title}: {:?}", titles(&drafts));
        assert_eq!(drafts[0].title, title);
        assert_eq!(drafts[0].severity, Severity::Critical);
    }
}

#[test]
fn warning_band_emits_single_warning() {
    let thresholds = Thresholds::default();
    let quality = healthy_quality("LINE-A1");

    let cases: [(&str, fn(&mut LineReading)); 5] = [
        ("High Temperature", |r| r.temperature = 40.0),
        ("Pressure Deviation", |r| r.pressure = 5.1),
        ("Pressure Deviation", |r| r.pressure = 6.9),
        ("High Vibration", |r| r.vibration = 3.2),
        ("Low Efficiency", |r| r.efficiency = 70.0),
    ];

    for (title, mutate) in cases {
        let mut reading = make_reading("LINE-A1");
        mutate(&mut reading);
        let drafts = evaluate(&reading, &quality, &thresholds);
        assert_eq!(drafts.len(), 1, "{title}: {:?}", titles(&drafts));
        assert_eq!(drafts[0].title, title);
        assert_eq!(drafts[0].severity, Severity::Warning);
    }
}

#[test]
fn bounds_are_inclusive() {
    let t = Thresholds::default();
    assert_eq!(t.temperature.classify(38.0), DimensionStatus::Warning);
    assert_eq!(t.temperature.classify(42.0), DimensionStatus::Critical);
    assert_eq!(t.temperature.classify(37.9), DimensionStatus::Normal);

    assert_eq!(t.pressure.classify(5.0), DimensionStatus::Critical);
    assert_eq!(t.pressure.classify(5.2), DimensionStatus::Warning);
    assert_eq!(t.pressure.classify(5.3), DimensionStatus::Normal);
    assert_eq!(t.pressure.classify(6.8), DimensionStatus::Warning);
    assert_eq!(t.pressure.classify(7.0), DimensionStatus::Critical);

    assert_eq!(t.vibration.classify(3.0), DimensionStatus::Warning);
    assert_eq!(t.vibration.classify(3.5), DimensionStatus::Critical);

    assert_eq!(t.efficiency.classify(75.0), DimensionStatus::Warning);
    assert_eq!(t.efficiency.classify(65.0), DimensionStatus::Critical);
    assert_eq!(t.efficiency.classify(75.1), DimensionStatus::Normal);

    assert_eq!(t.defect_rate.classify(5.0), DimensionStatus::Warning);
    assert_eq!(t.defect_rate.classify(8.0), DimensionStatus::Critical);
}

#[test]
fn metric_severity_sweep() {
    let thresholds = Thresholds::default();
    let quality = healthy_quality("LINE-A1");

    for step in 0..=200 {
        let temperature = 20.0 + f64::from(step) * 0.15;
        let mut reading = make_reading("LINE-A1");
        reading.temperature = temperature;
        let drafts = evaluate(&reading, &quality, &thresholds);

        let expected = if temperature >= 42.0 {
            Some(Severity::Critical)
        } else if temperature >= 38.0 {
            Some(Severity::Warning)
        } else {
            None
        };
        assert_eq!(drafts.first().map(|d| d.severity), expected, "t={temperature}");
        assert!(drafts.len() <= 1);
    }
}

#[test]
fn independent_metrics_fire_together_in_fixed_order() {
    let mut reading = make_reading("LINE-B1");
    reading.temperature = 43.0;
    reading.pressure = 5.1;
    reading.vibration = 3.6;
    reading.efficiency = 70.0;
    reading.status = LineStatus::Error;
    let quality = make_quality("LINE-B1", 9.0, TrendLabel::Declining);

    let drafts = evaluate(&reading, &quality, &Thresholds::default());
    assert_eq!(
        titles(&drafts),
        vec![
            "Critical Temperature",
            "Pressure Deviation",
            "Excessive Vibration",
            "Low Efficiency",
            "Line Error",
            "Critical Defect Rate",
            "Quality Declining",
        ]
    );
    assert!(drafts.iter().all(|d| d.line_id == "LINE-B1"));
}

#[test]
fn evaluation_is_deterministic() {
    let mut reading = make_reading("LINE-A1");
    reading.temperature = 39.0;
    reading.vibration = 3.7;
    let quality = make_quality("LINE-A1", 6.0, TrendLabel::Declining);
    let thresholds = Thresholds::default();

    let first = evaluate(&reading, &quality, &thresholds);
    let second = evaluate(&reading, &quality, &thresholds);
    assert_eq!(first, second);
}

#[test]
fn status_alerts() {
    let thresholds = Thresholds::default();
    let quality = healthy_quality("LINE-A2");

    let mut reading = make_reading("LINE-A2");
    reading.status = LineStatus::Error;
    let drafts = evaluate(&reading, &quality, &thresholds);
    assert_eq!(titles(&drafts), vec!["Line Error"]);
    assert_eq!(drafts[0].severity, Severity::Critical);
    assert!(drafts[0].message.contains("Assembly Line LINE-A2"));

    reading.status = LineStatus::Maintenance;
    let drafts = evaluate(&reading, &quality, &thresholds);
    assert_eq!(titles(&drafts), vec!["Maintenance Mode"]);
    assert_eq!(drafts[0].severity, Severity::Info);

    reading.status = LineStatus::Idle;
    assert!(evaluate(&reading, &quality, &thresholds).is_empty());
}

#[test]
fn quality_alerts() {
    let thresholds = Thresholds::default();
    let reading = make_reading("LINE-C1");

    let drafts = evaluate(
        &reading,
        &make_quality("LINE-C1", 6.5, TrendLabel::Stable),
        &thresholds,
    );
    assert_eq!(titles(&drafts), vec!["High Defect Rate"]);
    assert_eq!(drafts[0].message, "Defect rate at 6.5% above target");

    let drafts = evaluate(
        &reading,
        &make_quality("LINE-C1", 8.0, TrendLabel::Stable),
        &thresholds,
    );
    assert_eq!(titles(&drafts), vec!["Critical Defect Rate"]);

    // Declining trend warns even at a low defect rate
    let drafts = evaluate(
        &reading,
        &make_quality("LINE-C1", 1.0, TrendLabel::Declining),
        &thresholds,
    );
    assert_eq!(titles(&drafts), vec!["Quality Declining"]);
    assert_eq!(drafts[0].severity, Severity::Warning);

    let drafts = evaluate(
        &reading,
        &make_quality("LINE-C1", 1.0, TrendLabel::Improving),
        &thresholds,
    );
    assert!(drafts.is_empty());
}

#[test]
fn alert_messages_format_values() {
    let mut reading = make_reading("LINE-A1");
    reading.temperature = 43.04;
    let drafts = evaluate(&reading, &healthy_quality("LINE-A1"), &Thresholds::default());
    assert_eq!(
        drafts[0].message,
        "Temperature at 43.0°C exceeds critical threshold"
    );
}

#[test]
fn custom_rule_set() {
    let evaluator = RuleEvaluator::new(vec![
        Box::new(StatusRule),
        Box::new(MetricRule::new(Metric::Vibration)),
    ]);
    assert_eq!(evaluator.rules().len(), 2);
    assert_eq!(evaluator.rules()[1].id(), "vibration");

    let mut reading = make_reading("LINE-A1");
    reading.temperature = 50.0;
    reading.vibration = 3.1;
    reading.status = LineStatus::Maintenance;
    let drafts = evaluator.evaluate(&reading, &healthy_quality("LINE-A1"), &Thresholds::default());
    assert_eq!(titles(&drafts), vec!["Maintenance Mode", "High Vibration"]);
}

#[test]
fn metric_names_parse() {
    assert_eq!("defect_rate".parse::<Metric>().unwrap(), Metric::DefectRate);
    assert_eq!(Metric::Pressure.to_string(), "pressure");
    assert!("humidity".parse::<Metric>().is_err());
}

#[test]
fn health_scenario_critical_temperature() {
    let mut reading = make_reading("LINE-A1");
    reading.temperature = 43.0;
    let health = assess_health(&reading, &Thresholds::default());

    assert_eq!(health.health_score, 70.0);
    assert_eq!(health.predicted_maintenance_hours, 24);
    assert_eq!(health.temperature_status, DimensionStatus::Critical);
    assert_eq!(health.pressure_status, DimensionStatus::Normal);
    assert_eq!(health.vibration_status, DimensionStatus::Normal);
    assert_eq!(
        health.recommendations,
        vec!["Immediate cooling system inspection required"]
    );
}

#[test]
fn health_all_normal() {
    let health = assess_health(&make_reading("LINE-A1"), &Thresholds::default());
    assert_eq!(health.health_score, 100.0);
    assert_eq!(health.predicted_maintenance_hours, 200);
    assert_eq!(health.recommendations, vec!["All systems operating normally"]);
}

#[test]
fn health_deductions_are_additive() {
    let mut reading = make_reading("LINE-A1");
    reading.temperature = 39.0;
    reading.vibration = 3.2;
    let health = assess_health(&reading, &Thresholds::default());
    // 100 - 10 - 15
    assert_eq!(health.health_score, 75.0);
    assert_eq!(health.recommendations.len(), 2);

    reading.efficiency = 79.0;
    let health = assess_health(&reading, &Thresholds::default());
    assert_eq!(health.health_score, 65.0);
    assert_eq!(
        health.recommendations.last().map(String::as_str),
        Some("Performance optimization needed")
    );
}

#[test]
fn health_floors_at_zero() {
    let mut reading = make_reading("LINE-A1");
    reading.temperature = 44.0;
    reading.pressure = 7.5;
    reading.vibration = 3.9;
    reading.efficiency = 60.0;
    let health = assess_health(&reading, &Thresholds::default());
    assert_eq!(health.health_score, 0.0);
    assert_eq!(health.predicted_maintenance_hours, 24);
    assert_eq!(health.recommendations.len(), 4);
}

#[test]
fn health_stays_in_range() {
    let thresholds = Thresholds::default();
    for temperature in [20.0, 38.0, 42.0, 50.0] {
        for pressure in [4.0, 5.1, 6.0, 6.9, 8.0] {
            for vibration in [0.5, 3.0, 3.5] {
                for efficiency in [50.0, 79.9, 80.0, 95.0] {
                    let mut reading = make_reading("LINE-A1");
                    reading.temperature = temperature;
                    reading.pressure = pressure;
                    reading.vibration = vibration;
                    reading.efficiency = efficiency;
                    let health = assess_health(&reading, &thresholds);
                    assert!((0.0..=100.0).contains(&health.health_score));
                    assert!(health.predicted_maintenance_hours >= 24);
                    assert!(!health.recommendations.is_empty());
                }
            }
        }
    }
}

#[test]
fn maintenance_prediction_is_linear_with_floor() {
    assert_eq!(predict_maintenance_hours(100.0), 200);
    assert_eq!(predict_maintenance_hours(90.0), 100);
    assert_eq!(predict_maintenance_hours(85.5), 55);
    assert_eq!(predict_maintenance_hours(82.0), 24);
    assert_eq!(predict_maintenance_hours(0.0), 24);
}

#[test]
fn ledger_retains_latest_fifty() {
    let ledger = AlertLedger::new(50);
    for n in 1..=60 {
        ledger.record(draft("LINE-A1", n));
    }

    let active = ledger.active_alerts();
    assert_eq!(active.len(), 50);
    let seqs: Vec<u64> = active.iter().map(|a| a.id.seq()).collect();
    assert_eq!(seqs, (11..=60).collect::<Vec<_>>());
    assert_eq!(active[0].title, "Alert 11");
    assert_eq!(active[0].id.to_string(), "ALT-00011");
}

#[test]
fn ledger_never_reuses_ids_after_trim() {
    let ledger = AlertLedger::new(3);
    let ids: Vec<AlertId> = (0..5).map(|n| ledger.record(draft("L", n)).id).collect();
    assert_eq!(ledger.len(), 3);

    let next = ledger.record(draft("L", 99));
    assert_eq!(next.id.seq(), 6);
    assert!(ids.iter().all(|id| *id < next.id));
}

#[test]
fn ledger_trims_after_whole_batch() {
    let ledger = AlertLedger::new(50);
    let drafts: Vec<AlertDraft> = (0..55).map(|n| draft("L", n)).collect();
    let recorded = ledger.record_batch(drafts);

    assert_eq!(recorded.len(), 55);
    assert_eq!(ledger.len(), 50);
    assert_eq!(ledger.all_alerts()[0].id.seq(), 6);
    assert!(ledger.record_batch(Vec::new()).is_empty());
}

#[test]
fn ledger_new_alerts_start_open() {
    let ledger = AlertLedger::default();
    let alert = ledger.record(draft("LINE-A1", 1));
    assert!(!alert.acknowledged);
    assert!(!alert.resolved);
    assert_eq!(alert.line_id, "LINE-A1");
    assert_eq!(ledger.retention(), 50);
}

#[test]
fn ledger_acknowledge_and_resolve() {
    let ledger = AlertLedger::default();
    let first = ledger.record(AlertDraft::new("L", Severity::Critical, "A", "a"));
    let second = ledger.record(AlertDraft::new("L", Severity::Warning, "B", "b"));
    let third = ledger.record(AlertDraft::new("L", Severity::Info, "C", "c"));

    assert!(ledger.acknowledge(first.id));
    let acked = ledger.get(first.id).unwrap();
    assert!(acked.acknowledged);
    assert!(!acked.resolved);
    assert_eq!(ledger.active_alerts().len(), 3);

    assert!(ledger.resolve(second.id));
    let active = ledger.active_alerts();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].id, first.id);
    assert_eq!(active[1].id, third.id);

    let counts = ledger.counts_by_severity();
    assert_eq!(counts.critical, 1);
    assert_eq!(counts.warning, 0);
    assert_eq!(counts.info, 1);

    // Resolved alerts are kept until trimmed
    assert_eq!(ledger.len(), 3);
}

#[test]
fn ledger_unknown_id_is_a_no_op() {
    let ledger = AlertLedger::default();
    ledger.record(draft("L", 1));
    let before = ledger.all_alerts();

    assert!(!ledger.acknowledge(AlertId::new(999)));
    assert!(!ledger.resolve(AlertId::new(999)));
    assert!(ledger.get(AlertId::new(999)).is_none());
    assert_eq!(ledger.all_alerts(), before);
}

#[test]
fn ledger_trimmed_id_is_not_found() {
    let ledger = AlertLedger::new(2);
    let oldest = ledger.record(draft("L", 1));
    ledger.record(draft("L", 2));
    ledger.record(draft("L", 3));
    assert!(!ledger.resolve(oldest.id));
}

#[test]
fn ledger_concurrent_writers() {
    let ledger = AlertLedger::new(50);
    std::thread::scope(|s| {
        for t in 0..4 {
            let ledger = &ledger;
            s.spawn(move || {
                for n in 0..100 {
                    let alert = ledger.record(draft(&format!("L{t}"), n));
                    if n % 2 == 0 {
                        ledger.acknowledge(alert.id);
                    }
                    let _ = ledger.active_alerts();
                }
            });
        }
    });

    let alerts = ledger.all_alerts();
    assert_eq!(alerts.len(), 50);
    assert!(alerts.windows(2).all(|w| w[0].id < w[1].id));
    assert_eq!(alerts.last().map(|a| a.id.seq()), Some(400));
}

#[test]
fn thresholds_validation_rejects_inverted_bounds() {
    assert!(Thresholds::default().validate().is_ok());

    let t = Thresholds {
        temperature: UpperBound {
            warning: 45.0,
            critical: 42.0,
        },
        ..Default::default()
    };
    assert!(matches!(
        t.validate(),
        Err(ConfigError::InvalidThreshold {
            metric: "temperature",
            ..
        })
    ));

    let t = Thresholds {
        efficiency: LowerBound {
            warning: 60.0,
            critical: 65.0,
        },
        ..Default::default()
    };
    assert!(matches!(
        t.validate(),
        Err(ConfigError::InvalidThreshold {
            metric: "efficiency",
            ..
        })
    ));

    let t = Thresholds {
        pressure: BandBound {
            warning_low: 4.9,
            warning_high: 6.8,
            critical_low: 5.0,
            critical_high: 7.0,
        },
        ..Default::default()
    };
    assert!(t.validate().is_err());

    let t = Thresholds {
        defect_rate: UpperBound {
            warning: f64::NAN,
            critical: 8.0,
        },
        ..Default::default()
    };
    assert!(t.validate().is_err());
}

#[test]
fn engine_refuses_invalid_config() {
    let bad_thresholds = EngineConfig {
        thresholds: Thresholds {
            vibration: UpperBound {
                warning: 3.5,
                critical: 3.5,
            },
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(MonitorEngine::new(bad_thresholds).is_err());

    let zero_retention = EngineConfig {
        alert_retention: 0,
        ..Default::default()
    };
    assert!(matches!(
        MonitorEngine::new(zero_retention),
        Err(ConfigError::ZeroRetention)
    ));

    let bad_trend = EngineConfig {
        trend: TrendConfig {
            window: 20,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        MonitorEngine::new(bad_trend),
        Err(ConfigError::Trend(_))
    ));
}

#[test]
fn engine_cycle_scenario() {
    let engine = MonitorEngine::new(EngineConfig::default()).unwrap();
    let mut hot = make_reading("LINE-A1");
    hot.temperature = 43.0;
    let mut idle = make_reading("LINE-A2");
    idle.products_produced = 0;
    idle.defects = 0;

    let report = engine.run_cycle(&[hot, idle]);
    assert_eq!(report.cycle, 1);
    assert_eq!(report.new_alerts.len(), 1);
    assert_eq!(report.new_alerts[0].title, "Critical Temperature");
    assert_eq!(report.new_alerts[0].severity, Severity::Critical);
    assert_eq!(report.health[0].health_score, 70.0);
    assert_eq!(report.health[0].predicted_maintenance_hours, 24);

    let idle_quality = &report.quality[1];
    assert_eq!(idle_quality.defect_rate, 0.0);
    assert_eq!(idle_quality.quality_score, 100.0);
    assert_eq!(report.quality_summary.total_inspected, 1000);

    assert_eq!(engine.cycles_completed(), 1);
    assert_eq!(engine.ledger().counts_by_severity().critical, 1);
}

#[test]
fn engine_raises_quality_declining_over_cycles() {
    let engine = MonitorEngine::new(EngineConfig::default()).unwrap();
    let mut reading = make_reading("LINE-C1");

    let mut declining_seen = false;
    for defects in [10, 10, 10, 20, 40] {
        reading.defects = defects;
        let report = engine.run_cycle(std::slice::from_ref(&reading));
        if report.new_alerts.iter().any(|a| a.title == "Quality Declining") {
            declining_seen = true;
        }
    }
    assert!(declining_seen);
    assert_eq!(
        engine.quality_analyzer().tracker().history("LINE-C1").unwrap().len(),
        5
    );
}

#[test]
fn engine_health_on_demand_has_no_side_effects() {
    let engine = MonitorEngine::new(EngineConfig::default()).unwrap();
    let mut reading = make_reading("LINE-A1");
    reading.vibration = 3.2;

    let health = engine.assess_health(&reading);
    assert_eq!(health.vibration_status, DimensionStatus::Warning);
    assert_eq!(health.health_score, 85.0);
    assert!(engine.ledger().is_empty());
    assert_eq!(engine.cycles_completed(), 0);
    assert_eq!(engine.quality_analyzer().tracker().tracked_lines(), 0);
}

#[test]
fn engine_ledger_retention_applies_across_cycles() {
    let config = EngineConfig {
        alert_retention: 5,
        ..Default::default()
    };
    let engine = MonitorEngine::new(config).unwrap();
    let mut reading = make_reading("LINE-A1");
    reading.status = LineStatus::Maintenance;

    for _ in 0..8 {
        engine.run_cycle(std::slice::from_ref(&reading));
    }
    let alerts = engine.ledger().active_alerts();
    assert_eq!(alerts.len(), 5);
    assert_eq!(alerts[0].id.seq(), 4);
}
