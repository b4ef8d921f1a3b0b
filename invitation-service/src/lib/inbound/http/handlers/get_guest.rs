use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::add_guest::GuestData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::models::GuestId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_guest(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<GuestData>, ApiError> {
    let guest_id = GuestId::from_string(&id).map_err(GuestError::from)?;

    state
        .event_service
        .get_guest(&caller.user.id, &guest_id)
        .await
        .map_err(ApiError::from)
        .map(|ref guest| {
            ApiSuccess::new(StatusCode::OK, GuestData::new(guest, &state.public_base_url))
        })
}
