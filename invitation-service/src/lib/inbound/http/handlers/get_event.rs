use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::event::errors::EventError;
use crate::domain::event::models::Event;
use crate::domain::event::models::EventId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_event(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
) -> Result<ApiSuccess<EventData>, ApiError> {
    let event_id = EventId::from_string(&event_id).map_err(EventError::from)?;

    state
        .event_service
        .get_event(&caller.user.id, &event_id)
        .await
        .map_err(ApiError::from)
        .map(|ref event| ApiSuccess::new(StatusCode::OK, event.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventData {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub max_guests: Option<u32>,
    pub rsvp_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Event> for EventData {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            owner_id: event.owner_id.to_string(),
            title: event.title.as_str().to_string(),
            description: event.description.as_ref().map(|d| d.as_str().to_string()),
            starts_at: event.starts_at,
            location: event.location.as_str().to_string(),
            max_guests: event.max_guests.map(|c| c.get()),
            rsvp_deadline: event.rsvp_deadline,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}
