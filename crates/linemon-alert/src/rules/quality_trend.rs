use crate::{LineRule, RuleContext};
use linemon_common::types::{AlertDraft, Severity, TrendLabel};

/// Warns when a line's defect rate is trending upward, whatever its level.
pub struct QualityTrendRule;

impl LineRule for QualityTrendRule {
    fn id(&self) -> &str {
        "quality_trend"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<AlertDraft> {
        if ctx.quality.trend != TrendLabel::Declining {
            return None;
        }
        Some(AlertDraft::new(
            &ctx.quality.line_id,
            Severity::Warning,
            "Quality Declining",
            "Quality metrics show declining trend",
        ))
    }
}
