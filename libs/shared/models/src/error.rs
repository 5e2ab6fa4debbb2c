// libs/shared/models/src/error.rs
use thiserror::Error;

use crate::scheduling::{AppointmentType, EventStatus};

/// Failure surface of the calendar event store collaborator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("calendar read failed: {0}")]
    ReadFailed(String),

    #[error("calendar write failed: {0}")]
    WriteFailed(String),

    #[error("event not found: {0}")]
    NotFound(uuid::Uuid),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchedulingError {
    #[error("unknown provider: {0}")]
    UnknownProvider(uuid::Uuid),

    #[error("event not found: {0}")]
    EventNotFound(uuid::Uuid),

    #[error("provider is not qualified for {0} appointments")]
    ProviderNotQualified(AppointmentType),

    #[error("appointment conflicts with an existing booking")]
    ConflictDetected,

    #[error("invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("no transition allowed out of status: {0}")]
    InvalidStatusTransition(EventStatus),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SchedulingError {
    /// Transient failures may be retried; the availability view is left
    /// untouched when they occur. Everything else is a caller mistake and
    /// is rejected before any state mutation.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SchedulingError::Store(StoreError::ReadFailed(_) | StoreError::WriteFailed(_))
        )
    }
}
