use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use super::get_event::EventData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::event::errors::EventError;
use crate::domain::event::models::EventDescription;
use crate::domain::event::models::EventId;
use crate::domain::event::models::EventTitle;
use crate::domain::event::models::GuestCapacity;
use crate::domain::event::models::Location;
use crate::domain::event::models::UpdateEventCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_event(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<ApiSuccess<EventData>, ApiError> {
    let event_id = EventId::from_string(&event_id).map_err(EventError::from)?;

    state
        .event_service
        .update_event(&caller.user.id, &event_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref event| ApiSuccess::new(StatusCode::OK, event.into()))
}

/// HTTP request body for updating an event (raw JSON)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_guests: Option<i64>,
    pub rsvp_deadline: Option<DateTime<Utc>>,
}

impl UpdateEventRequest {
    fn try_into_command(self) -> Result<UpdateEventCommand, EventError> {
        // Validation happens here - errors are automatically converted via #[from]
        Ok(UpdateEventCommand {
            title: self.title.map(EventTitle::new).transpose()?,
            description: self.description.map(EventDescription::new).transpose()?,
            starts_at: self.starts_at,
            location: self.location.map(Location::new).transpose()?,
            max_guests: self.max_guests.map(GuestCapacity::new).transpose()?,
            rsvp_deadline: self.rsvp_deadline,
        })
    }
}
