use crate::error::{CollectorError, Result};
use crate::TelemetrySource;
use chrono::{Days, NaiveDate, Utc};
use linemon_common::types::{LineReading, LineStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Seconds of production represented by one poll.
const SECONDS_PER_POLL: f64 = 5.0;

const BASE_DEFECT_PROBABILITY: f64 = 0.02;
const STATUS_CHANGE_PROBABILITY: f64 = 0.01;
const RESUME_PROBABILITY: f64 = 0.3;
const MAINTENANCE_DONE_PROBABILITY: f64 = 0.1;

/// Static description of one simulated line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    pub id: String,
    pub name: String,
    pub target_speed: f64,
}

impl LineSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>, target_speed: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target_speed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Fixed RNG seed; `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_lines")]
    pub lines: Vec<LineSpec>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            lines: default_lines(),
        }
    }
}

fn default_lines() -> Vec<LineSpec> {
    vec![
        LineSpec::new("LINE-A1", "Assembly Line A1", 120.0),
        LineSpec::new("LINE-A2", "Assembly Line A2", 120.0),
        LineSpec::new("LINE-B1", "Packaging Line B1", 200.0),
        LineSpec::new("LINE-C1", "Quality Check C1", 150.0),
    ]
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lines.is_empty() {
            return Err(CollectorError::NoLines);
        }
        let mut seen = HashSet::new();
        for line in &self.lines {
            if !seen.insert(line.id.as_str()) {
                return Err(CollectorError::DuplicateLine(line.id.clone()));
            }
            if !line.target_speed.is_finite() || line.target_speed <= 0.0 {
                return Err(CollectorError::InvalidTargetSpeed {
                    line_id: line.id.clone(),
                    target_speed: line.target_speed,
                });
            }
        }
        Ok(())
    }
}

/// Simulated plant telemetry.
///
/// Each line starts from plausible operating values and drifts by a bounded
/// random walk on every poll. Running lines produce units, occasionally pick
/// up defects (more often when hot, shaky, or slow) and now and then change
/// status. Idle lines resume and maintenance completes with a fixed chance
/// per poll.
pub struct RandomWalkSource {
    rng: StdRng,
    lines: Vec<LineReading>,
}

impl RandomWalkSource {
    pub fn new(config: &SimulatorConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let today = Utc::now().date_naive();
        let lines = config
            .lines
            .iter()
            .map(|spec| initial_reading(&mut rng, spec, today))
            .collect();

        tracing::debug!(
            lines = config.lines.len(),
            seeded = config.seed.is_some(),
            "Random-walk source initialised"
        );
        Ok(Self { rng, lines })
    }

    /// Current readings without advancing the simulation.
    pub fn current(&self) -> &[LineReading] {
        &self.lines
    }

    fn step(&mut self) {
        let today = Utc::now().date_naive();
        for line in &mut self.lines {
            step_line(&mut self.rng, line, today);
        }
    }
}

impl TelemetrySource for RandomWalkSource {
    fn name(&self) -> &str {
        "random-walk"
    }

    fn poll(&mut self) -> Result<Vec<LineReading>> {
        self.step();
        Ok(self.lines.clone())
    }
}

fn initial_reading(rng: &mut StdRng, spec: &LineSpec, today: NaiveDate) -> LineReading {
    let days_since_maintenance = rng.gen_range(1..=30);
    LineReading {
        line_id: spec.id.clone(),
        name: spec.name.clone(),
        status: LineStatus::Running,
        current_speed: spec.target_speed * rng.gen_range(0.85..=1.0),
        target_speed: spec.target_speed,
        efficiency: rng.gen_range(85.0..=98.0),
        uptime: rng.gen_range(92.0..=99.0),
        temperature: rng.gen_range(20.0..=35.0),
        pressure: rng.gen_range(5.5..=6.5),
        vibration: rng.gen_range(0.5..=2.0),
        products_produced: rng.gen_range(5000..=15000),
        defects: rng.gen_range(50..=200),
        last_maintenance: today
            .checked_sub_days(Days::new(days_since_maintenance))
            .unwrap_or(today),
    }
}

fn step_line(rng: &mut StdRng, line: &mut LineReading, today: NaiveDate) {
    match line.status {
        LineStatus::Running => step_running(rng, line),
        LineStatus::Idle => {
            line.current_speed = 0.0;
            if rng.gen_bool(RESUME_PROBABILITY) {
                line.status = LineStatus::Running;
            }
        }
        LineStatus::Maintenance => {
            line.current_speed = 0.0;
            if rng.gen_bool(MAINTENANCE_DONE_PROBABILITY) {
                line.status = LineStatus::Running;
                line.last_maintenance = today;
            }
        }
        // The simulator never enters Error on its own; readings injected in
        // that state stay there.
        LineStatus::Error => {}
    }
}

fn step_running(rng: &mut StdRng, line: &mut LineReading) {
    line.current_speed = (line.current_speed + rng.gen_range(-5.0..=5.0))
        .clamp(0.0, line.target_speed * 1.1);

    let ratio = line.current_speed / line.target_speed * 100.0;
    line.efficiency = (ratio + rng.gen_range(-2.0..=2.0)).clamp(70.0, 100.0);

    line.temperature = (line.temperature + rng.gen_range(-1.0..=1.0)).clamp(18.0, 45.0);
    line.pressure = (line.pressure + rng.gen_range(-0.2..=0.2)).clamp(5.0, 7.0);
    line.vibration = (line.vibration + rng.gen_range(-0.3..=0.3)).clamp(0.3, 4.0);

    line.products_produced += (line.current_speed / 60.0 * SECONDS_PER_POLL) as u64;

    let mut defect_probability = BASE_DEFECT_PROBABILITY;
    if line.temperature > 38.0 {
        defect_probability += 0.03;
    }
    if line.vibration > 3.0 {
        defect_probability += 0.02;
    }
    if line.efficiency < 80.0 {
        defect_probability += 0.02;
    }
    if rng.gen_bool(defect_probability) {
        line.defects += rng.gen_range(1..=3);
    }

    if rng.gen_bool(STATUS_CHANGE_PROBABILITY) {
        let next = match rng.gen_range(0..3) {
            0 => LineStatus::Running,
            1 => LineStatus::Idle,
            _ => LineStatus::Maintenance,
        };
        if next != line.status {
            tracing::debug!(line_id = %line.line_id, status = %next, "Simulated status change");
        }
        line.status = next;
    }
}
