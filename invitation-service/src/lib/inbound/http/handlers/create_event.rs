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
use crate::domain::event::models::CreateEventCommand;
use crate::domain::event::models::EventDescription;
use crate::domain::event::models::EventTitle;
use crate::domain::event::models::GuestCapacity;
use crate::domain::event::models::Location;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_event(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<CreateEventRequest>,
) -> Result<ApiSuccess<EventData>, ApiError> {
    state
        .event_service
        .create_event(&caller.user.id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref event| ApiSuccess::new(StatusCode::CREATED, event.into()))
}

/// HTTP request body for creating an event (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateEventRequest {
    title: String,
    description: Option<String>,
    starts_at: DateTime<Utc>,
    location: String,
    max_guests: Option<i64>,
    rsvp_deadline: Option<DateTime<Utc>>,
}

impl CreateEventRequest {
    fn try_into_command(self) -> Result<CreateEventCommand, EventError> {
        Ok(CreateEventCommand {
            title: EventTitle::new(self.title)?,
            description: self.description.map(EventDescription::new).transpose()?,
            starts_at: self.starts_at,
            location: Location::new(self.location)?,
            max_guests: self.max_guests.map(GuestCapacity::new).transpose()?,
            rsvp_deadline: self.rsvp_deadline,
        })
    }
}
