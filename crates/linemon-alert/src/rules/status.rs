use crate::{LineRule, RuleContext};
use linemon_common::types::{AlertDraft, LineStatus, Severity};

/// Alerts on lines that report an error or are down for maintenance.
pub struct StatusRule;

impl LineRule for StatusRule {
    fn id(&self) -> &str {
        "status"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<AlertDraft> {
        let reading = ctx.reading;
        match reading.status {
            LineStatus::Error => Some(AlertDraft::new(
                &reading.line_id,
                Severity::Critical,
                "Line Error",
                format!("Production line {} has encountered an error", reading.name),
            )),
            LineStatus::Maintenance => Some(AlertDraft::new(
                &reading.line_id,
                Severity::Info,
                "Maintenance Mode",
                format!("Production line {} is under maintenance", reading.name),
            )),
            LineStatus::Running | LineStatus::Idle => None,
        }
    }
}
