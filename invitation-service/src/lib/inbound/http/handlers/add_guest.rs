use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::event::errors::EventError;
use crate::domain::event::models::EventId;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::models::AddGuestCommand;
use crate::domain::guest::models::ContactInfo;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::GuestName;
use crate::domain::guest::models::PhoneNumber;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::outbound::notifications::confirmation_url;

/// Invite a guest; the response carries the freshly minted token and link.
pub async fn add_guest(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    Json(body): Json<AddGuestRequest>,
) -> Result<ApiSuccess<GuestData>, ApiError> {
    let event_id = EventId::from_string(&event_id).map_err(EventError::from)?;
    let command = body.try_into_command()?;

    state
        .event_service
        .add_guest(&caller.user.id, &event_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref guest| {
            ApiSuccess::new(
                StatusCode::CREATED,
                GuestData::new(guest, &state.public_base_url),
            )
        })
}

/// HTTP request body for inviting a guest (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddGuestRequest {
    name: String,
    email: Option<String>,
    phone: Option<String>,
}

impl AddGuestRequest {
    fn try_into_command(self) -> Result<AddGuestCommand, GuestError> {
        let name = GuestName::new(self.name)?;
        let email = non_blank(self.email).map(EmailAddress::new).transpose()?;
        let phone = non_blank(self.phone).map(PhoneNumber::new).transpose()?;
        Ok(AddGuestCommand::new(name, ContactInfo { email, phone }))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Owner-facing view of a guest, including the invitation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestData {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: &'static str,
    pub responded_at: Option<DateTime<Utc>>,
    pub additional_guests: u32,
    pub notes: Option<String>,
    pub token: String,
    pub confirmation_url: String,
    pub created_at: DateTime<Utc>,
}

impl GuestData {
    pub fn new(guest: &Guest, public_base_url: &str) -> Self {
        Self {
            id: guest.id.to_string(),
            event_id: guest.event_id.to_string(),
            name: guest.name.as_str().to_string(),
            email: guest.contact.email.as_ref().map(|e| e.as_str().to_string()),
            phone: guest.contact.phone.as_ref().map(|p| p.as_str().to_string()),
            status: guest.status.as_str(),
            responded_at: guest.responded_at,
            additional_guests: guest.details.additional_guests,
            notes: guest.details.notes.clone(),
            token: guest.token.as_str().to_string(),
            confirmation_url: confirmation_url(public_base_url, guest.token.as_str()),
            created_at: guest.created_at,
        }
    }
}
