//! Source ports and the fan-out fetch that feeds aggregation.
//!
//! The four collections are fetched concurrently and awaited jointly; a
//! failure in any one fails the whole batch. Rendering a schedule from a
//! subset of sources would be misleading, so partial aggregation is not a
//! supported state.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{CalendarEvent, SourceBatch, TaskRecord, TrainingPlan, VacationPlan};

/// Read-only port over the four schedule source collections.
#[async_trait]
pub trait ScheduleSources: Send + Sync {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError>;
    async fn fetch_vacations(&self) -> Result<Vec<VacationPlan>, FetchError>;
    async fn fetch_trainings(&self) -> Result<Vec<TrainingPlan>, FetchError>;
    async fn fetch_events(&self) -> Result<Vec<CalendarEvent>, FetchError>;
}

/// Fetch all four collections concurrently.
///
/// Returns the first error if any source fails; the batch is all-or-nothing.
pub async fn fetch_all<S: ScheduleSources + ?Sized>(
    sources: &S,
) -> Result<SourceBatch, FetchError> {
    let (tasks, vacations, trainings, events) = tokio::try_join!(
        sources.fetch_tasks(),
        sources.fetch_vacations(),
        sources.fetch_trainings(),
        sources.fetch_events(),
    )?;

    Ok(SourceBatch {
        tasks,
        vacations,
        trainings,
        events,
    })
}

/// In-memory sources for tests and previews.
#[derive(Debug, Clone, Default)]
pub struct StaticSources {
    pub tasks: Vec<TaskRecord>,
    pub vacations: Vec<VacationPlan>,
    pub trainings: Vec<TrainingPlan>,
    pub events: Vec<CalendarEvent>,
}

#[async_trait]
impl ScheduleSources for StaticSources {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
        Ok(self.tasks.clone())
    }

    async fn fetch_vacations(&self) -> Result<Vec<VacationPlan>, FetchError> {
        Ok(self.vacations.clone())
    }

    async fn fetch_trainings(&self) -> Result<Vec<TrainingPlan>, FetchError> {
        Ok(self.trainings.clone())
    }

    async fn fetch_events(&self) -> Result<Vec<CalendarEvent>, FetchError> {
        Ok(self.events.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceKind;
    use chrono::NaiveDate;

    struct BrokenVacations {
        inner: StaticSources,
    }

    #[async_trait]
    impl ScheduleSources for BrokenVacations {
        async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
            self.inner.fetch_tasks().await
        }

        async fn fetch_vacations(&self) -> Result<Vec<VacationPlan>, FetchError> {
            Err(FetchError::Unavailable {
                kind: SourceKind::Vacations,
                message: "backend offline".to_string(),
            })
        }

        async fn fetch_trainings(&self) -> Result<Vec<TrainingPlan>, FetchError> {
            self.inner.fetch_trainings().await
        }

        async fn fetch_events(&self) -> Result<Vec<CalendarEvent>, FetchError> {
            self.inner.fetch_events().await
        }
    }

    fn sample_sources() -> StaticSources {
        StaticSources {
            tasks: vec![TaskRecord {
                id: "t1".to_string(),
                title: "Ship Q2 report".to_string(),
                due_date: NaiveDate::from_ymd_opt(2025, 6, 12),
                status: "New".to_string(),
                priority: None,
                assignee_name: None,
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn fetch_all_joins_the_four_collections() {
        let batch = fetch_all(&sample_sources()).await.unwrap();
        assert_eq!(batch.tasks.len(), 1);
        assert!(batch.vacations.is_empty());
        assert!(batch.trainings.is_empty());
        assert!(batch.events.is_empty());
    }

    #[tokio::test]
    async fn one_failing_source_fails_the_whole_batch() {
        let sources = BrokenVacations {
            inner: sample_sources(),
        };
        let err = fetch_all(&sources).await.unwrap_err();
        assert_eq!(err.source_kind(), SourceKind::Vacations);
    }

    #[tokio::test]
    async fn trait_object_sources_work() {
        let sources: Box<dyn ScheduleSources> = Box::new(sample_sources());
        let batch = fetch_all(sources.as_ref()).await.unwrap();
        assert_eq!(batch.tasks.len(), 1);
    }
}
