//! Fetch-error taxonomy for the schedule sources.
//!
//! A failed source fetch fails the whole refresh; the schedule is never
//! rendered from a subset of sources. Retrying is a manual user action;
//! `is_retryable` only tells the rendering layer whether offering a retry
//! makes sense.

use serde::Serialize;
use thiserror::Error;

/// Which upstream collection a fetch error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Tasks,
    Vacations,
    Trainings,
    Events,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Tasks => "tasks",
            SourceKind::Vacations => "vacations",
            SourceKind::Trainings => "trainings",
            SourceKind::Events => "events",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error fetching one of the four source collections.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{kind} request failed: {message}")]
    Http { kind: SourceKind, message: String },

    #[error("{kind} request returned HTTP {status}")]
    Status { kind: SourceKind, status: u16 },

    #[error("{kind} payload could not be decoded: {message}")]
    Decode { kind: SourceKind, message: String },

    /// Non-HTTP source implementations report failures through this.
    #[error("{kind} source unavailable: {message}")]
    Unavailable { kind: SourceKind, message: String },
}

impl FetchError {
    /// The source collection this error belongs to.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            FetchError::Http { kind, .. }
            | FetchError::Status { kind, .. }
            | FetchError::Decode { kind, .. }
            | FetchError::Unavailable { kind, .. } => *kind,
        }
    }

    /// Whether a manual retry could plausibly succeed. Transport failures
    /// and server-side errors are transient; a payload that does not match
    /// the wire contract is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http { .. } | FetchError::Unavailable { .. } => true,
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::Decode { .. } => false,
        }
    }
}

/// Serializable failure payload for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshFailure {
    pub message: String,
    pub failed_source: SourceKind,
    pub can_retry: bool,
}

impl From<&FetchError> for RefreshFailure {
    fn from(err: &FetchError) -> Self {
        RefreshFailure {
            message: err.to_string(),
            failed_source: err.source_kind(),
            can_retry: err.is_retryable(),
        }
    }
}
