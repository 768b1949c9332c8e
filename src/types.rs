//! Wire types for the four schedule sources and the derived schedule item.
//!
//! Source records arrive as camelCase JSON from the workspace backend and
//! are consumed read-only. `ScheduleItem` is the common display shape the
//! aggregation produces; the mapping is lossy: source fields
//! with no counterpart in the common shape are dropped for this view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A task with a deadline, as delivered by the task endpoint.
///
/// `due_date` is required by the data contract. It is optional at the wire
/// layer so a violating record can be skipped during aggregation instead of
/// failing the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_name: Option<String>,
}

/// A vacation request. All approval states are shown on the schedule;
/// status is surfaced so the caller can badge pending/rejected entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationPlan {
    pub id: String,
    /// Leave category, e.g. "Annual Leave". Used as the display label.
    #[serde(rename = "type")]
    pub plan_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A training plan. Plans without a start date are not yet scheduled and
/// never appear on the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub id: String,
    pub course_name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// Company calendar event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Holiday,
    Training,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Holiday => "holiday",
            EventType::Training => "training",
        }
    }
}

/// A company calendar event (public holiday or scheduled training day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The four source collections of one refresh, fetched jointly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBatch {
    pub tasks: Vec<TaskRecord>,
    pub vacations: Vec<VacationPlan>,
    pub trainings: Vec<TrainingPlan>,
    pub events: Vec<CalendarEvent>,
}

/// Which source a schedule item came from. A closed tag set; the rendering
/// layer groups and styles by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Vacation,
    Training,
    Holiday,
    Event,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Task,
        ItemKind::Vacation,
        ItemKind::Training,
        ItemKind::Holiday,
        ItemKind::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Task => "task",
            ItemKind::Vacation => "vacation",
            ItemKind::Training => "training",
            ItemKind::Holiday => "holiday",
            ItemKind::Event => "event",
        }
    }
}

/// The common display shape produced by aggregation. Transient: rebuilt
/// wholesale on every refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    /// Source-prefixed (`task-<id>`, `vacation-<id>`, `training-<id>`,
    /// `event-<id>`) so ids stay unique even when raw ids collide across
    /// sources.
    pub id: String,
    pub title: String,
    pub kind: ItemKind,
    /// Anchor date: due date for tasks, start date for plans and events.
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Source-specific status (task status, plan approval status).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

/// Aggregation output: the windowed, date-ordered list plus truncation and
/// anomaly accounting for the "+N more" affordance and upstream reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingSchedule {
    pub items: Vec<ScheduleItem>,
    pub overflow_count: usize,
    pub skipped_malformed: usize,
}

impl UpcomingSchedule {
    /// Item counts per kind, in kind order, zero-count kinds omitted.
    /// Powers the group badges in the rendering layer.
    pub fn kind_counts(&self) -> Vec<(ItemKind, usize)> {
        ItemKind::ALL
            .iter()
            .filter_map(|kind| {
                let count = self.items.iter().filter(|i| i.kind == *kind).count();
                (count > 0).then_some((*kind, count))
            })
            .collect()
    }
}

fn default_horizon_days() -> u32 {
    30
}

fn default_compact_limit() -> usize {
    6
}

fn default_full_limit() -> usize {
    10
}

/// Schedule-view configuration, loaded from the host app's camelCase JSON
/// config. Every field has a default so an absent section means defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Forward-looking window length in days.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Item limit for the compact dashboard widget.
    #[serde(default = "default_compact_limit")]
    pub compact_limit: usize,
    /// Item limit for the full schedule view.
    #[serde(default = "default_full_limit")]
    pub full_limit: usize,
    /// Base URL of the workspace REST backend, e.g. "https://api.example.com/v1/".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            compact_limit: default_compact_limit(),
            full_limit: default_full_limit(),
            api_base_url: None,
        }
    }
}
