use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type holding the caller resolved from the bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
}

/// Middleware that resolves the session token and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers())
        .map_err(IntoResponse::into_response)?
        .to_string();

    let user = state
        .auth_service
        .authenticate(&token)
        .await
        .map_err(|e| {
            tracing::warn!(kind = e.kind(), "Session validation failed");
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(req).await)
}

/// Read the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("INVALID_TOKEN", "Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("INVALID_TOKEN", "Invalid Authorization header"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::unauthorized(
            "INVALID_TOKEN",
            "Invalid Authorization header format. Expected: Bearer <token>",
        )
    })
}
