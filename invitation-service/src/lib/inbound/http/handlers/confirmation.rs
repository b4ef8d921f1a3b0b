use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::confirmation::models::InvitationView;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::ResponseDetails;
use crate::domain::guest::models::RsvpDecision;
use crate::inbound::http::router::AppState;

/// Show an invitation to whoever holds its token.
pub async fn get_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<InvitationData>, ApiError> {
    state
        .confirmation_service
        .resolve(&token)
        .await
        .map_err(ApiError::from)
        .map(|ref view| ApiSuccess::new(StatusCode::OK, InvitationData::new(view, Utc::now())))
}

/// Record the guest's answer.
pub async fn respond_to_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<RespondRequest>,
) -> Result<ApiSuccess<InvitationGuestData>, ApiError> {
    let details = ResponseDetails::new(body.additional_guests.unwrap_or(0), body.notes)
        .map_err(GuestError::from)?;

    state
        .confirmation_service
        .respond(&token, body.action.into(), details)
        .await
        .map_err(ApiError::from)
        .map(|ref guest| ApiSuccess::new(StatusCode::OK, guest.into()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
    Confirm,
    Decline,
}

impl From<RespondAction> for RsvpDecision {
    fn from(action: RespondAction) -> Self {
        match action {
            RespondAction::Confirm => RsvpDecision::Confirm,
            RespondAction::Decline => RsvpDecision::Decline,
        }
    }
}

/// HTTP request body for answering an invitation (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RespondRequest {
    action: RespondAction,
    additional_guests: Option<u32>,
    notes: Option<String>,
}

/// Guest-facing view: the guest's own answer, no contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationGuestData {
    pub name: String,
    pub status: &'static str,
    pub responded_at: Option<DateTime<Utc>>,
    pub additional_guests: u32,
    pub notes: Option<String>,
}

impl From<&Guest> for InvitationGuestData {
    fn from(guest: &Guest) -> Self {
        Self {
            name: guest.name.as_str().to_string(),
            status: guest.status.as_str(),
            responded_at: guest.responded_at,
            additional_guests: guest.details.additional_guests,
            notes: guest.details.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationEventData {
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub location: String,
    pub rsvp_deadline: Option<DateTime<Utc>>,
    pub responses_closed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationData {
    pub guest: InvitationGuestData,
    pub event: InvitationEventData,
}

impl InvitationData {
    fn new(view: &InvitationView, now: DateTime<Utc>) -> Self {
        let event = &view.event;
        Self {
            guest: (&view.guest).into(),
            event: InvitationEventData {
                title: event.title.as_str().to_string(),
                description: event.description.as_ref().map(|d| d.as_str().to_string()),
                starts_at: event.starts_at,
                location: event.location.as_str().to_string(),
                rsvp_deadline: event.rsvp_deadline,
                responses_closed: event.is_closed(now),
            },
        }
    }
}
