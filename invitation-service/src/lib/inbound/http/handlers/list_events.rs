use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::get_event::EventData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_events(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<EventData>>, ApiError> {
    state
        .event_service
        .list_events(&caller.user.id)
        .await
        .map_err(ApiError::from)
        .map(|events| ApiSuccess::new(StatusCode::OK, events.iter().map(EventData::from).collect()))
}
