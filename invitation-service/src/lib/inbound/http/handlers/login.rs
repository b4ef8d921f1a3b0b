use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::register::UserData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Exchange form-encoded credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Form(body): Form<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let issued = state
        .auth_service
        .login(&body.username, &body.password)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: (&issued.user).into(),
            token: issued.token.into_inner(),
            expires_at: issued.session.expires_at,
        },
    ))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
