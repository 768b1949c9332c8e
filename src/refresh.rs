//! Refresh lifecycle for the schedule view.
//!
//! One refresh = fetch all four sources, aggregate, publish. The view state
//! is an explicit tagged union rather than ad hoc flags, and every refresh
//! attempt carries a sequence number: a completion is published only when
//! no later attempt has started, so a slow refresh can never overwrite a
//! newer one's result. In-flight requests are not aborted; a superseded
//! result is simply discarded when it lands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::aggregate::{aggregate_upcoming, AggregationParams};
use crate::error::{FetchError, RefreshFailure};
use crate::sources::{fetch_all, ScheduleSources};
use crate::types::UpcomingSchedule;

/// p95 latency budget for a full refresh (fetch + aggregate).
const REFRESH_LATENCY_BUDGET_MS: u128 = 1_500;

/// State of the schedule view, serialized for the rendering layer.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RefreshState {
    #[default]
    Idle,
    Loading {
        #[serde(rename = "startedAt")]
        started_at: DateTime<Utc>,
        #[serde(rename = "refreshSeq")]
        refresh_seq: u64,
    },
    Loaded {
        schedule: UpcomingSchedule,
        #[serde(rename = "finishedAt")]
        finished_at: DateTime<Utc>,
        #[serde(rename = "refreshSeq")]
        refresh_seq: u64,
    },
    Failed {
        error: RefreshFailure,
        #[serde(rename = "refreshSeq")]
        refresh_seq: u64,
    },
}

impl RefreshState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RefreshState::Loading { .. })
    }

    /// The loaded schedule, if the last published refresh succeeded.
    pub fn schedule(&self) -> Option<&UpcomingSchedule> {
        match self {
            RefreshState::Loaded { schedule, .. } => Some(schedule),
            _ => None,
        }
    }
}

/// The schedule view: owns the refresh state and the sources behind it.
///
/// There is one logical writer: the most recently started refresh. Earlier
/// refreshes that complete late see a newer sequence number and leave the
/// state alone.
pub struct ScheduleView<S> {
    sources: S,
    state: RwLock<RefreshState>,
    refresh_seq: AtomicU64,
}

impl<S: ScheduleSources> ScheduleView<S> {
    pub fn new(sources: S) -> Self {
        Self {
            sources,
            state: RwLock::new(RefreshState::Idle),
            refresh_seq: AtomicU64::new(0),
        }
    }

    /// Current published state.
    pub fn state(&self) -> RefreshState {
        self.state.read().clone()
    }

    /// Run one refresh: fetch all sources, aggregate, publish under the
    /// sequence guard.
    ///
    /// Returns this attempt's own outcome regardless of whether it was
    /// published; `state()` always reflects the latest attempt.
    pub async fn refresh(
        &self,
        params: AggregationParams,
    ) -> Result<UpcomingSchedule, FetchError> {
        let seq = self.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(
            seq,
            RefreshState::Loading {
                started_at: Utc::now(),
                refresh_seq: seq,
            },
        );

        let started = Instant::now();
        let outcome = fetch_all(&self.sources).await;
        let elapsed_ms = started.elapsed().as_millis();
        if elapsed_ms > REFRESH_LATENCY_BUDGET_MS {
            log::warn!(
                "schedule refresh {seq} exceeded latency budget: {elapsed_ms}ms > {REFRESH_LATENCY_BUDGET_MS}ms"
            );
        } else {
            log::debug!("schedule refresh {seq} completed in {elapsed_ms}ms");
        }

        match outcome {
            Ok(batch) => {
                let schedule = aggregate_upcoming(&batch, &params);
                self.publish(
                    seq,
                    RefreshState::Loaded {
                        schedule: schedule.clone(),
                        finished_at: Utc::now(),
                        refresh_seq: seq,
                    },
                );
                Ok(schedule)
            }
            Err(err) => {
                log::warn!("schedule refresh {seq} failed: {err}");
                self.publish(
                    seq,
                    RefreshState::Failed {
                        error: RefreshFailure::from(&err),
                        refresh_seq: seq,
                    },
                );
                Err(err)
            }
        }
    }

    /// Write `next` only if no later refresh has started.
    fn publish(&self, seq: u64, next: RefreshState) {
        let mut state = self.state.write();
        if self.refresh_seq.load(Ordering::SeqCst) == seq {
            *state = next;
        } else {
            log::debug!("schedule refresh {seq} superseded; discarding result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceKind;
    use crate::sources::StaticSources;
    use crate::types::{CalendarEvent, TaskRecord, TrainingPlan, VacationPlan};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, due: NaiveDate) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            title: format!("Task {id}"),
            due_date: Some(due),
            status: "New".to_string(),
            priority: None,
            assignee_name: None,
        }
    }

    fn params() -> AggregationParams {
        AggregationParams {
            reference_date: date(2025, 6, 10),
            horizon_days: 30,
            display_limit: 10,
        }
    }

    /// Sources whose task data and fetch delay can be swapped between
    /// calls; the data is captured at call start, before the delay.
    #[derive(Clone, Default)]
    struct SwappableSources {
        tasks: Arc<Mutex<Vec<TaskRecord>>>,
        delay_ms: Arc<AtomicU64>,
    }

    #[async_trait]
    impl ScheduleSources for SwappableSources {
        async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
            let tasks = self.tasks.lock().clone();
            let delay = self.delay_ms.load(Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(tasks)
        }

        async fn fetch_vacations(&self) -> Result<Vec<VacationPlan>, FetchError> {
            Ok(Vec::new())
        }

        async fn fetch_trainings(&self) -> Result<Vec<TrainingPlan>, FetchError> {
            Ok(Vec::new())
        }

        async fn fetch_events(&self) -> Result<Vec<CalendarEvent>, FetchError> {
            Ok(Vec::new())
        }
    }

    struct FailingSources;

    #[async_trait]
    impl ScheduleSources for FailingSources {
        async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
            Err(FetchError::Unavailable {
                kind: SourceKind::Tasks,
                message: "backend offline".to_string(),
            })
        }

        async fn fetch_vacations(&self) -> Result<Vec<VacationPlan>, FetchError> {
            Ok(Vec::new())
        }

        async fn fetch_trainings(&self) -> Result<Vec<TrainingPlan>, FetchError> {
            Ok(Vec::new())
        }

        async fn fetch_events(&self) -> Result<Vec<CalendarEvent>, FetchError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn successful_refresh_publishes_loaded() {
        let view = ScheduleView::new(StaticSources {
            tasks: vec![task("t1", date(2025, 6, 12))],
            ..Default::default()
        });
        assert!(matches!(view.state(), RefreshState::Idle));

        let schedule = view.refresh(params()).await.unwrap();
        assert_eq!(schedule.items.len(), 1);

        match view.state() {
            RefreshState::Loaded { schedule, refresh_seq, .. } => {
                assert_eq!(schedule.items[0].id, "task-t1");
                assert_eq!(refresh_seq, 1);
            }
            other => panic!("expected loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_fetch_publishes_failed_with_source() {
        let view = ScheduleView::new(FailingSources);
        let err = view.refresh(params()).await.unwrap_err();
        assert_eq!(err.source_kind(), SourceKind::Tasks);

        match view.state() {
            RefreshState::Failed { error, .. } => {
                assert_eq!(error.failed_source, SourceKind::Tasks);
                assert!(error.can_retry);
            }
            other => panic!("expected failed, got {other:?}"),
        }
    }

    /// Fails the task fetch once, then defers to the inner sources.
    struct FlakyTasks {
        inner: StaticSources,
        failed_once: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl ScheduleSources for FlakyTasks {
        async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
            if !self.failed_once.swap(true, Ordering::SeqCst) {
                return Err(FetchError::Unavailable {
                    kind: SourceKind::Tasks,
                    message: "backend offline".to_string(),
                });
            }
            self.inner.fetch_tasks().await
        }

        async fn fetch_vacations(&self) -> Result<Vec<VacationPlan>, FetchError> {
            self.inner.fetch_vacations().await
        }

        async fn fetch_trainings(&self) -> Result<Vec<TrainingPlan>, FetchError> {
            self.inner.fetch_trainings().await
        }

        async fn fetch_events(&self) -> Result<Vec<CalendarEvent>, FetchError> {
            self.inner.fetch_events().await
        }
    }

    #[tokio::test]
    async fn manual_retry_after_failure_recovers() {
        let view = ScheduleView::new(FlakyTasks {
            inner: StaticSources {
                tasks: vec![task("t1", date(2025, 6, 12))],
                ..Default::default()
            },
            failed_once: std::sync::atomic::AtomicBool::new(false),
        });

        assert!(view.refresh(params()).await.is_err());
        assert!(matches!(view.state(), RefreshState::Failed { .. }));

        let schedule = view.refresh(params()).await.unwrap();
        assert_eq!(schedule.items.len(), 1);
        match view.state() {
            RefreshState::Loaded { refresh_seq, .. } => assert_eq!(refresh_seq, 2),
            other => panic!("expected loaded, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn late_result_of_superseded_refresh_is_discarded() {
        let sources = SwappableSources::default();
        *sources.tasks.lock() = vec![task("old", date(2025, 6, 12))];
        sources.delay_ms.store(500, Ordering::SeqCst);

        let view = Arc::new(ScheduleView::new(sources.clone()));

        let slow = {
            let view = view.clone();
            tokio::spawn(async move { view.refresh(params()).await })
        };

        // Let the slow refresh register its sequence number and capture the
        // old data before starting the newer one.
        tokio::time::sleep(Duration::from_millis(50)).await;
        *sources.tasks.lock() = vec![task("new", date(2025, 6, 13))];
        sources.delay_ms.store(0, Ordering::SeqCst);

        let fast = view.refresh(params()).await.unwrap();
        assert_eq!(fast.items[0].id, "task-new");

        // The slow refresh still returns its own (stale) result to its
        // caller, but must not overwrite the published state.
        let slow_result = slow.await.unwrap().unwrap();
        assert_eq!(slow_result.items[0].id, "task-old");

        match view.state() {
            RefreshState::Loaded { schedule, refresh_seq, .. } => {
                assert_eq!(schedule.items[0].id, "task-new");
                assert_eq!(refresh_seq, 2);
            }
            other => panic!("expected loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_window_is_loaded_not_failed() {
        let view = ScheduleView::new(StaticSources::default());
        let schedule = view.refresh(params()).await.unwrap();
        assert!(schedule.items.is_empty());
        assert!(matches!(view.state(), RefreshState::Loaded { .. }));
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let state = RefreshState::Idle;
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "idle");
    }
}
