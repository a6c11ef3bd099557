use crate::error::{QualityError, Result};
use linemon_common::types::TrendLabel;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

/// Number of samples averaged at each end of the classification window.
const SUB_WINDOW: usize = 2;

/// Tunable knobs of the defect-rate trend classifier.
///
/// The ratios are sensitivity thresholds, not calibrated statistics: a new
/// average below `improving_ratio × old` reads as improving, above
/// `declining_ratio × old` as declining.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_improving_ratio")]
    pub improving_ratio: f64,
    #[serde(default = "default_declining_ratio")]
    pub declining_ratio: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            min_samples: default_min_samples(),
            window: default_window(),
            improving_ratio: default_improving_ratio(),
            declining_ratio: default_declining_ratio(),
        }
    }
}

fn default_history_capacity() -> usize {
    10
}

fn default_min_samples() -> usize {
    3
}

fn default_window() -> usize {
    5
}

fn default_improving_ratio() -> f64 {
    0.9
}

fn default_declining_ratio() -> f64 {
    1.1
}

impl TrendConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window < SUB_WINDOW {
            return Err(QualityError::InvalidTrendConfig(format!(
                "window must be at least {SUB_WINDOW}, got {}",
                self.window
            )));
        }
        if self.min_samples < SUB_WINDOW {
            return Err(QualityError::InvalidTrendConfig(format!(
                "min_samples must be at least {SUB_WINDOW}, got {}",
                self.min_samples
            )));
        }
        if self.history_capacity < self.window || self.history_capacity < self.min_samples {
            return Err(QualityError::InvalidTrendConfig(format!(
                "history_capacity {} must hold the window ({}) and min_samples ({})",
                self.history_capacity, self.window, self.min_samples
            )));
        }
        let ratios_ok = self.improving_ratio.is_finite()
            && self.declining_ratio.is_finite()
            && self.improving_ratio > 0.0
            && self.improving_ratio <= 1.0
            && self.declining_ratio >= 1.0;
        if !ratios_ok {
            return Err(QualityError::InvalidTrendConfig(format!(
                "expected 0 < improving_ratio <= 1 <= declining_ratio, got {} and {}",
                self.improving_ratio, self.declining_ratio
            )));
        }
        Ok(())
    }
}

/// Fixed-capacity FIFO of defect-rate samples for one line.
pub struct TrendHistory {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl TrendHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a sample, evicting the oldest once over capacity.
    pub fn push(&mut self, sample: f64) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn samples(&self) -> &VecDeque<f64> {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn classify(&self, config: &TrendConfig) -> TrendLabel {
        if self.samples.len() < config.min_samples {
            return TrendLabel::Stable;
        }

        let start = self.samples.len().saturating_sub(config.window);
        let recent: Vec<f64> = self.samples.iter().skip(start).copied().collect();
        if recent.len() < SUB_WINDOW {
            return TrendLabel::Stable;
        }
        let avg_old = mean(&recent[..SUB_WINDOW]);
        let avg_new = mean(&recent[recent.len() - SUB_WINDOW..]);

        if avg_new < avg_old * config.improving_ratio {
            TrendLabel::Improving
        } else if avg_new > avg_old * config.declining_ratio {
            TrendLabel::Declining
        } else {
            TrendLabel::Stable
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Per-line defect-rate histories.
///
/// Histories are created lazily on a line's first sample. Each line has its
/// own lock, so recording for one line never waits on another; the outer map
/// is only write-locked to insert a new line.
pub struct TrendTracker {
    config: TrendConfig,
    histories: RwLock<HashMap<String, Arc<Mutex<TrendHistory>>>>,
}

impl TrendTracker {
    /// Validates `config` and builds an empty tracker.
    pub fn new(config: TrendConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            histories: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Records `defect_rate` for `line_id` and classifies the line's trend.
    pub fn record_and_classify(&self, line_id: &str, defect_rate: f64) -> TrendLabel {
        let history = self.history_for(line_id);
        let mut history = history.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        history.push(defect_rate);
        let label = history.classify(&self.config);
        tracing::trace!(line_id, defect_rate, samples = history.len(), %label, "Trend classified");
        label
    }

    /// Copy of a line's recorded samples, oldest first.
    pub fn history(&self, line_id: &str) -> Option<Vec<f64>> {
        let histories = self
            .histories
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let history = histories.get(line_id)?;
        let history = history.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(history.samples().iter().copied().collect())
    }

    pub fn tracked_lines(&self) -> usize {
        self.histories
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn history_for(&self, line_id: &str) -> Arc<Mutex<TrendHistory>> {
        {
            let histories = self
                .histories
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(history) = histories.get(line_id) {
                return Arc::clone(history);
            }
        }

        let mut histories = self
            .histories
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let capacity = self.config.history_capacity;
        Arc::clone(
            histories
                .entry(line_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(TrendHistory::new(capacity)))),
        )
    }
}
