use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::confirmation::errors::ConfirmationError;
use crate::domain::dashboard::errors::DashboardError;
use crate::domain::event::errors::EventError;
use crate::domain::guest::errors::GuestError;
use crate::domain::session::errors::AuthError;
use crate::domain::user::errors::UserError;

pub mod add_guest;
pub mod change_password;
pub mod confirmation;
pub mod create_event;
pub mod dashboard;
pub mod delete_event;
pub mod get_event;
pub mod get_guest;
pub mod health;
pub mod list_events;
pub mod list_guests;
pub mod login;
pub mod logout;
pub mod register;
pub mod remove_guest;
pub mod update_event;
pub mod update_guest;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// HTTP-facing error carrying a stable kind and a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    UnprocessableEntity(String),
    BadRequest(String),
    Unauthorized { kind: &'static str, message: String },
    Forbidden(String),
    NotFound { kind: &'static str, message: String },
    Conflict { kind: &'static str, message: String },
    Gone { kind: &'static str, message: String },
}

impl ApiError {
    pub fn validation(err: impl std::fmt::Display) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }

    pub fn unauthorized(kind: &'static str, message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            kind,
            message: message.into(),
        }
    }

    fn into_parts(self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", msg)
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "INFRASTRUCTURE", msg)
            }
            ApiError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION", msg)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Unauthorized { kind, message } => (StatusCode::UNAUTHORIZED, kind, message),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::NotFound { kind, message } => (StatusCode::NOT_FOUND, kind, message),
            ApiError::Conflict { kind, message } => (StatusCode::CONFLICT, kind, message),
            ApiError::Gone { kind, message } => (StatusCode::GONE, kind, message),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = self.into_parts();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), kind, %message, "Request failed");
        }

        (
            status,
            Json(ApiResponseBody::new_error(status, kind, message)),
        )
            .into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let kind = err.kind();
        match err {
            UserError::NotFound(_) => ApiError::NotFound {
                kind,
                message: err.to_string(),
            },
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict {
                    kind,
                    message: err.to_string(),
                }
            }
            UserError::InvalidCredentials => ApiError::unauthorized(kind, err.to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidFullName(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidRole(_) => ApiError::validation(err),
            UserError::Infrastructure(_) => ApiError::ServiceUnavailable(err.to_string()),
            UserError::Hashing(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let kind = err.kind();
        match err {
            AuthError::InvalidCredentials | AuthError::Expired | AuthError::InvalidToken => {
                ApiError::unauthorized(kind, err.to_string())
            }
            AuthError::Infrastructure(_) => ApiError::ServiceUnavailable(err.to_string()),
            AuthError::Internal(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<EventError> for ApiError {
    fn from(err: EventError) -> Self {
        let kind = err.kind();
        match err {
            EventError::InvalidEventId(_)
            | EventError::InvalidTitle(_)
            | EventError::InvalidDescription(_)
            | EventError::InvalidLocation(_)
            | EventError::InvalidCapacity(_) => ApiError::validation(err),
            EventError::NotFound(_) | EventError::GuestNotFound(_) => ApiError::NotFound {
                kind,
                message: err.to_string(),
            },
            EventError::Forbidden { .. } => {
                ApiError::Forbidden("You do not have access to this resource".to_string())
            }
            EventError::CapacityReached { .. } => ApiError::Conflict {
                kind,
                message: err.to_string(),
            },
            EventError::Infrastructure(_) => ApiError::ServiceUnavailable(err.to_string()),
            EventError::TokenSpaceExhausted { .. } | EventError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<GuestError> for ApiError {
    fn from(err: GuestError) -> Self {
        match err {
            GuestError::InvalidGuestId(_)
            | GuestError::InvalidName(_)
            | GuestError::InvalidEmail(_)
            | GuestError::InvalidPhone(_)
            | GuestError::InvalidStatus(_)
            | GuestError::InvalidDetails(_) => ApiError::validation(err),
            other => ApiError::from(EventError::from(other)),
        }
    }
}

impl From<ConfirmationError> for ApiError {
    fn from(err: ConfirmationError) -> Self {
        let kind = err.kind();
        match err {
            ConfirmationError::TokenNotFound => ApiError::NotFound {
                kind,
                message: err.to_string(),
            },
            ConfirmationError::ConflictingState { .. } => ApiError::Conflict {
                kind,
                message: err.to_string(),
            },
            ConfirmationError::Closed { .. } => ApiError::Gone {
                kind,
                message: err.to_string(),
            },
            ConfirmationError::Infrastructure(_) => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            ConfirmationError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Infrastructure(_) => ApiError::ServiceUnavailable(err.to_string()),
            DashboardError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, kind: &'static str, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                kind: kind.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub kind: String,
    pub message: String,
}
