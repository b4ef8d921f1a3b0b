use thiserror::Error;

use crate::domain::errors::InfrastructureError;
use crate::domain::guest::errors::GuestError;
use crate::domain::user::models::UserId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventTitleError {
    #[error("Event title is empty")]
    Empty,

    #[error("Event title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("Description too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location is empty")]
    Empty,

    #[error("Location too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapacityError {
    #[error("Guest capacity must be between {min} and {max}, got {actual}")]
    OutOfRange { min: u32, max: u32, actual: i64 },
}

/// Top-level error for event and guest-list operations
#[derive(Debug, Clone, Error)]
pub enum EventError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid event ID: {0}")]
    InvalidEventId(#[from] EventIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] EventTitleError),

    #[error("Invalid description: {0}")]
    InvalidDescription(#[from] DescriptionError),

    #[error("Invalid location: {0}")]
    InvalidLocation(#[from] LocationError),

    #[error("Invalid capacity: {0}")]
    InvalidCapacity(#[from] CapacityError),

    // Domain-level errors
    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Guest not found: {0}")]
    GuestNotFound(String),

    #[error("User {user_id} does not own event {event_id}")]
    Forbidden { user_id: UserId, event_id: String },

    #[error("Event {event_id} has reached its capacity of {capacity} guests")]
    CapacityReached { event_id: String, capacity: u32 },

    #[error("Could not mint a unique invitation token after {attempts} attempts")]
    TokenSpaceExhausted { attempts: usize },

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl EventError {
    pub fn kind(&self) -> &'static str {
        match self {
            EventError::InvalidEventId(_)
            | EventError::InvalidTitle(_)
            | EventError::InvalidDescription(_)
            | EventError::InvalidLocation(_)
            | EventError::InvalidCapacity(_) => "VALIDATION",
            EventError::NotFound(_) | EventError::GuestNotFound(_) => "NOT_FOUND",
            EventError::Forbidden { .. } => "FORBIDDEN",
            EventError::CapacityReached { .. } => "CAPACITY_REACHED",
            EventError::Infrastructure(_) => InfrastructureError::KIND,
            EventError::TokenSpaceExhausted { .. } | EventError::Unknown(_) => "INTERNAL",
        }
    }
}

impl From<GuestError> for EventError {
    fn from(err: GuestError) -> Self {
        match err {
            GuestError::NotFound(id) => EventError::GuestNotFound(id),
            GuestError::TokenSpaceExhausted { attempts } => {
                EventError::TokenSpaceExhausted { attempts }
            }
            GuestError::Infrastructure(e) => EventError::Infrastructure(e),
            other => EventError::Unknown(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for EventError {
    fn from(err: anyhow::Error) -> Self {
        EventError::Unknown(err.to_string())
    }
}
