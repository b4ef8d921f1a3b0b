use thiserror::Error;

use crate::domain::errors::InfrastructureError;
use crate::domain::event::errors::EventError;
use crate::domain::guest::errors::GuestError;

#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DashboardError {
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Infrastructure(_) => InfrastructureError::KIND,
            DashboardError::Unknown(_) => "INTERNAL",
        }
    }
}

impl From<EventError> for DashboardError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Infrastructure(e) => DashboardError::Infrastructure(e),
            other => DashboardError::Unknown(other.to_string()),
        }
    }
}

impl From<GuestError> for DashboardError {
    fn from(err: GuestError) -> Self {
        match err {
            GuestError::Infrastructure(e) => DashboardError::Infrastructure(e),
            other => DashboardError::Unknown(other.to_string()),
        }
    }
}
