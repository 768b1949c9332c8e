//! Display urgency derived from an item's approval/delay status.
//!
//! Classification is independent of date proximity: it reflects whether a
//! record is delayed or awaiting approval, not how soon its date is. An
//! approved vacation starting tomorrow renders the same as one starting in
//! three weeks.

use serde::Serialize;

use crate::types::ScheduleItem;

/// Delayed tasks use the task backend's title-case status.
const TASK_STATUS_DELAYED: &str = "Delayed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Warning => "warning",
            Urgency::Critical => "critical",
        }
    }
}

/// Classify a schedule item for badge styling.
///
/// Plan statuses are matched case-insensitively; the plan endpoints have
/// delivered both "pending" and "Pending" over time.
pub fn classify(item: &ScheduleItem) -> Urgency {
    match item.status.as_deref() {
        Some(status)
            if status == TASK_STATUS_DELAYED || status.eq_ignore_ascii_case("rejected") =>
        {
            Urgency::Critical
        }
        Some(status) if status.eq_ignore_ascii_case("pending") => Urgency::Warning,
        _ => Urgency::Normal,
    }
}
