//! Rule evaluation and alert lifecycle for monitored production lines.
//!
//! Each cycle, [`engine::MonitorEngine`] runs a line's reading and quality
//! metrics through the registered [`LineRule`]s in a fixed order, records the
//! resulting drafts in the [`ledger::AlertLedger`], and derives a
//! [`MachineHealth`](linemon_common::types::MachineHealth) assessment.
//! Built-in rules cover metric thresholds, line status, and quality trend.

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod health;
pub mod ledger;
pub mod rules;
pub mod thresholds;

#[cfg(test)]
mod tests;

use linemon_common::types::{AlertDraft, LineReading, QualityMetrics};
use thresholds::Thresholds;

/// Everything a rule may look at for one line in one cycle.
pub struct RuleContext<'a> {
    pub reading: &'a LineReading,
    pub quality: &'a QualityMetrics,
    pub thresholds: &'a Thresholds,
}

/// A rule that inspects one line's snapshot and optionally produces an
/// [`AlertDraft`].
///
/// Rules are stateless; anything time-dependent (such as the defect-rate
/// trend) arrives precomputed in the [`RuleContext`]. A rule emits at most
/// one draft per evaluation, so severity precedence is the rule's concern.
pub trait LineRule: Send + Sync {
    /// Stable identifier for this rule (e.g., `"temperature"`).
    fn id(&self) -> &str;

    /// Evaluates the snapshot and returns a draft if the rule condition holds.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<AlertDraft>;
}
