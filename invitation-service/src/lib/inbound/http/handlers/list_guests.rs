use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::add_guest::GuestData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::event::errors::EventError;
use crate::domain::event::models::EventId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_guests(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
) -> Result<ApiSuccess<Vec<GuestData>>, ApiError> {
    let event_id = EventId::from_string(&event_id).map_err(EventError::from)?;

    let guests = state
        .event_service
        .list_guests(&caller.user.id, &event_id)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        guests
            .iter()
            .map(|guest| GuestData::new(guest, &state.public_base_url))
            .collect(),
    ))
}
