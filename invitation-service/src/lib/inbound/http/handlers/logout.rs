use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// End the presented session. Unknown, expired or already closed sessions
/// succeed as well, so repeating a logout is harmless.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<()>, ApiError> {
    let token = bearer_token(&headers)?;

    state
        .auth_service
        .logout(token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
