use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::event::errors::EventError;
use crate::domain::event::models::EventId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Delete an event together with its guests.
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let event_id = EventId::from_string(&id).map_err(EventError::from)?;

    state
        .event_service
        .delete_event(&caller.user.id, &event_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
