use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::http::Uri;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::add_guest::add_guest;
use super::handlers::change_password::change_password;
use super::handlers::confirmation::get_invitation;
use super::handlers::confirmation::respond_to_invitation;
use super::handlers::create_event::create_event;
use super::handlers::dashboard::dashboard;
use super::handlers::delete_event::delete_event;
use super::handlers::get_event::get_event;
use super::handlers::get_guest::get_guest;
use super::handlers::health::health;
use super::handlers::list_events::list_events;
use super::handlers::list_guests::list_guests;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::register::register;
use super::handlers::remove_guest::remove_guest;
use super::handlers::update_event::update_event;
use super::handlers::update_guest::update_guest;
use super::middleware::authenticate as auth_middleware;
use crate::domain::confirmation::ports::ConfirmationServicePort;
use crate::domain::confirmation::service::ConfirmationService;
use crate::domain::dashboard::ports::DashboardServicePort;
use crate::domain::dashboard::service::DashboardService;
use crate::domain::event::ports::EventRepository;
use crate::domain::event::ports::EventServicePort;
use crate::domain::event::service::EventService;
use crate::domain::guest::ports::GuestRepository;
use crate::domain::guest::ports::InvitationNotifier;
use crate::domain::session::ports::AuthServicePort;
use crate::domain::session::ports::SessionStore;
use crate::domain::session::service::AuthService;
use crate::domain::user::ports::CredentialStore;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
    pub event_service: Arc<dyn EventServicePort>,
    pub confirmation_service: Arc<dyn ConfirmationServicePort>,
    pub dashboard_service: Arc<dyn DashboardServicePort>,
    /// Origin used to build confirmation links handed back to owners.
    pub public_base_url: Arc<str>,
}

impl AppState {
    /// Wire every domain service over one set of storage adapters.
    pub fn new<CS, SS, ER, GR, N>(
        credentials: Arc<CS>,
        sessions: Arc<SS>,
        events: Arc<ER>,
        guests: Arc<GR>,
        notifier: Arc<N>,
        session_ttl: chrono::Duration,
        public_base_url: &str,
    ) -> Self
    where
        CS: CredentialStore,
        SS: SessionStore,
        ER: EventRepository,
        GR: GuestRepository,
        N: InvitationNotifier,
    {
        let user_service = Arc::new(UserService::new(credentials));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_service),
            sessions,
            session_ttl,
        ));
        let event_service = Arc::new(EventService::new(
            Arc::clone(&events),
            Arc::clone(&guests),
            notifier,
        ));
        let confirmation_service = Arc::new(ConfirmationService::new(
            Arc::clone(&guests),
            Arc::clone(&events),
        ));
        let dashboard_service = Arc::new(DashboardService::new(events, guests));

        Self {
            user_service,
            auth_service,
            event_service,
            confirmation_service,
            dashboard_service,
            public_base_url: Arc::from(public_base_url),
        }
    }
}

const CONFIRM_PREFIX: &str = "/api/confirm/";

/// Request path with any invitation token cut down to a short prefix.
fn loggable_uri(uri: &Uri) -> String {
    match uri.path().strip_prefix(CONFIRM_PREFIX) {
        Some(token) => {
            let prefix: String = token.chars().take(6).collect();
            format!("{}{}…", CONFIRM_PREFIX, prefix)
        }
        None => uri.path().to_string(),
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/users", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route(
            "/api/confirm/:token",
            get(get_invitation).post(respond_to_invitation),
        );

    let protected_routes = Router::new()
        .route("/api/auth/password", post(change_password))
        .route("/api/dashboard", get(dashboard))
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:event_id",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route(
            "/api/events/:event_id/guests",
            get(list_guests).post(add_guest),
        )
        .route(
            "/api/guests/:guest_id",
            get(get_guest).patch(update_guest).delete(remove_guest),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out: they carry bearer tokens.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %loggable_uri(request.uri()),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %loggable_uri(request.uri()),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
