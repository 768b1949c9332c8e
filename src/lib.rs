//! Upcoming-schedule aggregation for the team workspace dashboard.
//!
//! Four source collections (tasks, vacation plans, training plans, and
//! company calendar events) are fetched concurrently, merged into one
//! windowed, date-ordered list of schedule items, and classified for
//! display. The refresh lifecycle is an explicit state machine with a
//! sequence guard so a slow refresh can never overwrite a newer one.

pub mod aggregate;
pub mod calendar;
mod error;
pub mod http;
pub mod refresh;
pub mod sources;
pub mod types;
pub mod urgency;

pub use aggregate::{aggregate_upcoming, AggregationParams};
pub use error::{FetchError, RefreshFailure, SourceKind};
pub use http::HttpSources;
pub use refresh::{RefreshState, ScheduleView};
pub use sources::{fetch_all, ScheduleSources, StaticSources};
pub use types::{
    CalendarEvent, EventType, ItemKind, ScheduleConfig, ScheduleItem, SourceBatch, TaskRecord,
    TrainingPlan, UpcomingSchedule, VacationPlan,
};
pub use urgency::{classify, Urgency};
