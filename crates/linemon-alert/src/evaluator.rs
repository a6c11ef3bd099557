use crate::rules::metric::{Metric, MetricRule};
use crate::rules::quality_trend::QualityTrendRule;
use crate::rules::status::StatusRule;
use crate::thresholds::Thresholds;
use crate::{LineRule, RuleContext};
use linemon_common::types::{AlertDraft, LineReading, QualityMetrics};

/// Runs an ordered list of [`LineRule`]s over one line's snapshot.
///
/// Drafts come back in rule order, so identical input always yields
/// identical output.
pub struct RuleEvaluator {
    rules: Vec<Box<dyn LineRule>>,
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleEvaluator {
    pub fn new(rules: Vec<Box<dyn LineRule>>) -> Self {
        Self { rules }
    }

    /// The built-in rule set: temperature, pressure, vibration, efficiency,
    /// line status, then defect rate and quality trend.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(MetricRule::new(Metric::Temperature)),
            Box::new(MetricRule::new(Metric::Pressure)),
            Box::new(MetricRule::new(Metric::Vibration)),
            Box::new(MetricRule::new(Metric::Efficiency)),
            Box::new(StatusRule),
            Box::new(MetricRule::new(Metric::DefectRate)),
            Box::new(QualityTrendRule),
        ])
    }

    pub fn rules(&self) -> &[Box<dyn LineRule>] {
        &self.rules
    }

    pub fn evaluate(
        &self,
        reading: &LineReading,
        quality: &QualityMetrics,
        thresholds: &Thresholds,
    ) -> Vec<AlertDraft> {
        let ctx = RuleContext {
            reading,
            quality,
            thresholds,
        };
        self.rules
            .iter()
            .filter_map(|rule| {
                let draft = rule.evaluate(&ctx);
                if let Some(ref d) = draft {
                    tracing::trace!(
                        rule_id = rule.id(),
                        line_id = %d.line_id,
                        severity = %d.severity,
                        "Rule triggered"
                    );
                }
                draft
            })
            .collect()
    }
}

/// Evaluates `reading` against the standard rule set.
pub fn evaluate(
    reading: &LineReading,
    quality: &QualityMetrics,
    thresholds: &Thresholds,
) -> Vec<AlertDraft> {
    RuleEvaluator::standard().evaluate(reading, quality, thresholds)
}
