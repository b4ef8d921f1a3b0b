use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::add_guest::GuestData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::models::GuestId;
use crate::domain::guest::models::GuestName;
use crate::domain::guest::models::PhoneNumber;
use crate::domain::guest::models::UpdateGuestCommand;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Correct a guest's name or contact details. The invitation link stays valid.
pub async fn update_guest(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateGuestRequest>,
) -> Result<ApiSuccess<GuestData>, ApiError> {
    let guest_id = GuestId::from_string(&id).map_err(GuestError::from)?;

    state
        .event_service
        .update_guest(&caller.user.id, &guest_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref guest| {
            ApiSuccess::new(StatusCode::OK, GuestData::new(guest, &state.public_base_url))
        })
}

/// HTTP request body for editing a guest (raw JSON)
///
/// Only profile fields are accepted; status and response details belong to
/// the guest.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGuestRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UpdateGuestRequest {
    fn try_into_command(self) -> Result<UpdateGuestCommand, GuestError> {
        Ok(UpdateGuestCommand {
            name: self.name.map(GuestName::new).transpose()?,
            email: self.email.map(EmailAddress::new).transpose()?,
            phone: self.phone.map(PhoneNumber::new).transpose()?,
        })
    }
}
