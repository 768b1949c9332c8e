//! REST-backed source implementation.
//!
//! One GET per collection against the workspace backend. Endpoints return
//! camelCase JSON arrays of the wire types in `types`. Transport, status,
//! and decode failures map to the corresponding `FetchError` variants so
//! the rendering layer can tell a dead backend from a broken payload.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{FetchError, SourceKind};
use crate::sources::ScheduleSources;
use crate::types::{CalendarEvent, TaskRecord, TrainingPlan, VacationPlan};

const TASKS_PATH: &str = "tasks";
const VACATIONS_PATH: &str = "vacation-plans";
const TRAININGS_PATH: &str = "training-plans";
const EVENTS_PATH: &str = "calendar-events";

/// Schedule sources backed by the workspace REST API.
///
/// `base_url` should end with a trailing slash when it carries a path
/// (`https://api.example.com/v1/`), otherwise joining replaces the last
/// segment.
pub struct HttpSources {
    client: Client,
    base_url: Url,
}

impl HttpSources {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured client (timeouts, proxies, default headers).
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Build from the configured base URL string
    /// (`ScheduleConfig::api_base_url`).
    pub fn from_base_url(base_url: &str) -> Result<Self, url::ParseError> {
        Url::parse(base_url).map(Self::new)
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        kind: SourceKind,
    ) -> Result<Vec<T>, FetchError> {
        let url = self.base_url.join(path).map_err(|e| FetchError::Http {
            kind,
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Http {
                kind,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                kind,
                status: status.as_u16(),
            });
        }

        response.json::<Vec<T>>().await.map_err(|e| FetchError::Decode {
            kind,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ScheduleSources for HttpSources {
    async fn fetch_tasks(&self) -> Result<Vec<TaskRecord>, FetchError> {
        self.get_collection(TASKS_PATH, SourceKind::Tasks).await
    }

    async fn fetch_vacations(&self) -> Result<Vec<VacationPlan>, FetchError> {
        self.get_collection(VACATIONS_PATH, SourceKind::Vacations).await
    }

    async fn fetch_trainings(&self) -> Result<Vec<TrainingPlan>, FetchError> {
        self.get_collection(TRAININGS_PATH, SourceKind::Trainings).await
    }

    async fn fetch_events(&self) -> Result<Vec<CalendarEvent>, FetchError> {
        self.get_collection(EVENTS_PATH, SourceKind::Events).await
    }
}
