use anyhow::Context;
use linemon_alert::engine::EngineConfig;
use linemon_alert::ledger::DEFAULT_RETENTION;
use linemon_alert::thresholds::Thresholds;
use linemon_collector::simulator::SimulatorConfig;
use linemon_quality::trend::TrendConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Seconds between evaluation cycles
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    /// Maximum number of alerts kept in the ledger
    #[serde(default = "default_alert_retention")]
    pub alert_retention: usize,

    /// CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub trend: TrendConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

fn default_http_port() -> u16 {
    5001
}

fn default_cycle_interval_secs() -> u64 {
    3
}

fn default_alert_retention() -> usize {
    DEFAULT_RETENTION
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            cycle_interval_secs: default_cycle_interval_secs(),
            alert_retention: default_alert_retention(),
            cors_allowed_origins: Vec::new(),
            thresholds: Thresholds::default(),
            trend: TrendConfig::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the config at `path`. A missing file yields the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            tracing::info!(path, "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{path}'"))?;
        Ok(config)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            thresholds: self.thresholds.clone(),
            trend: self.trend.clone(),
            alert_retention: self.alert_retention,
        }
    }

    /// Checks everything the engine and simulator would reject, plus the
    /// cycle interval.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cycle_interval_secs == 0 {
            anyhow::bail!("cycle_interval_secs must be greater than 0");
        }
        self.engine_config()
            .validate()
            .context("Invalid alert configuration")?;
        self.simulator
            .validate()
            .context("Invalid simulator configuration")?;
        Ok(())
    }
}
