use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Password;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Rotate the caller's secret. Every session of the caller, this one
/// included, is revoked.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let new_password = Password::new(body.new_password).map_err(ApiError::validation)?;

    state
        .auth_service
        .change_password(&caller.user, &body.current_password, new_password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}
