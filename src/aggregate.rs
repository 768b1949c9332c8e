//! Upcoming-schedule aggregation: windowing, inclusion, mapping, ordering.
//!
//! Merges the four source collections into one date-ordered list for
//! display. The window is `[reference - 1 day, reference + horizon)`; the
//! one-day backward slack keeps items due today visible even when a due
//! date carries a time-of-day before "now". The view is forward-looking
//! only; overdue-but-incomplete tasks are a different surface's concern.

use chrono::{Duration, NaiveDate};

use crate::types::{
    CalendarEvent, EventType, ItemKind, ScheduleConfig, ScheduleItem, SourceBatch, TaskRecord,
    TrainingPlan, UpcomingSchedule, VacationPlan,
};

/// Terminal task status. Completed tasks never appear regardless of date:
/// the schedule shows pending obligations, not history.
const TASK_STATUS_COMPLETED: &str = "Completed";

/// Parameters of one aggregation pass. The reference date is injectable so
/// results are reproducible; callers pass `Local::now().date_naive()` in
/// production.
#[derive(Debug, Clone)]
pub struct AggregationParams {
    pub reference_date: NaiveDate,
    pub horizon_days: u32,
    pub display_limit: usize,
}

impl AggregationParams {
    /// Compact dashboard widget: 30-day horizon, 6 items.
    pub fn compact(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            horizon_days: 30,
            display_limit: 6,
        }
    }

    /// Full schedule view: 30-day horizon, 10 items.
    pub fn full(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            horizon_days: 30,
            display_limit: 10,
        }
    }

    /// Widget parameters from the host configuration.
    pub fn compact_from(config: &ScheduleConfig, reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            horizon_days: config.horizon_days,
            display_limit: config.compact_limit,
        }
    }

    /// Full-view parameters from the host configuration.
    pub fn full_from(config: &ScheduleConfig, reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            horizon_days: config.horizon_days,
            display_limit: config.full_limit,
        }
    }

    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    /// Half-open window `[start, end)`. With a zero horizon this degenerates
    /// to `[reference - 1, reference)`, i.e. same-day items only.
    fn window(&self) -> (NaiveDate, NaiveDate) {
        (
            self.reference_date - Duration::days(1),
            self.reference_date + Duration::days(i64::from(self.horizon_days)),
        )
    }
}

fn in_window(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date < end
}

/// Merge the four collections into one windowed, date-ordered schedule.
///
/// Pure over already-fetched data: it never fails for well-formed input,
/// and a task violating the due-date contract is skipped and counted, not
/// fatal. Ties on the same date keep the source enumeration order (tasks,
/// vacations, trainings, events).
pub fn aggregate_upcoming(batch: &SourceBatch, params: &AggregationParams) -> UpcomingSchedule {
    let (window_start, window_end) = params.window();
    let mut included: Vec<ScheduleItem> = Vec::new();
    let mut skipped_malformed = 0usize;

    for task in &batch.tasks {
        let Some(due) = task.due_date else {
            log::warn!("task {} has no due date; skipping", task.id);
            skipped_malformed += 1;
            continue;
        };
        if task.status == TASK_STATUS_COMPLETED || !in_window(due, window_start, window_end) {
            continue;
        }
        included.push(map_task(task, due));
    }

    for plan in &batch.vacations {
        if in_window(plan.start_date, window_start, window_end) {
            included.push(map_vacation(plan));
        }
    }

    for plan in &batch.trainings {
        // No start date means not yet scheduled. Policy exclusion, not an anomaly.
        let Some(start) = plan.start_date else {
            continue;
        };
        if in_window(start, window_start, window_end) {
            included.push(map_training(plan, start));
        }
    }

    for event in &batch.events {
        if in_window(event.start_date, window_start, window_end) {
            included.push(map_event(event));
        }
    }

    included.sort_by_key(|item| item.date);

    let total = included.len();
    included.truncate(params.display_limit);

    UpcomingSchedule {
        items: included,
        overflow_count: total.saturating_sub(params.display_limit),
        skipped_malformed,
    }
}

fn map_task(task: &TaskRecord, due: NaiveDate) -> ScheduleItem {
    ScheduleItem {
        id: format!("task-{}", task.id),
        title: task.title.clone(),
        kind: ItemKind::Task,
        date: due,
        end_date: None,
        status: Some(task.status.clone()),
        priority: task.priority.clone(),
        description: None,
        owner_name: task.assignee_name.clone(),
    }
}

fn map_vacation(plan: &VacationPlan) -> ScheduleItem {
    ScheduleItem {
        id: format!("vacation-{}", plan.id),
        title: plan.plan_type.clone(),
        kind: ItemKind::Vacation,
        date: plan.start_date,
        end_date: Some(plan.end_date),
        status: Some(plan.status.clone()),
        priority: None,
        description: plan.notes.clone(),
        owner_name: plan.user_name.clone(),
    }
}

fn map_training(plan: &TrainingPlan, start: NaiveDate) -> ScheduleItem {
    ScheduleItem {
        id: format!("training-{}", plan.id),
        title: plan.course_name.clone(),
        kind: ItemKind::Training,
        date: start,
        end_date: plan.end_date,
        status: Some(plan.status.clone()),
        priority: None,
        description: plan.platform.clone(),
        owner_name: plan.user_name.clone(),
    }
}

fn map_event(event: &CalendarEvent) -> ScheduleItem {
    let kind = match event.event_type {
        EventType::Holiday => ItemKind::Holiday,
        EventType::Training => ItemKind::Training,
    };
    ScheduleItem {
        id: format!("event-{}", event.id),
        title: event.title.clone(),
        kind,
        date: event.start_date,
        end_date: Some(event.end_date),
        status: None,
        priority: None,
        description: event.description.clone(),
        owner_name: None,
    }
}
