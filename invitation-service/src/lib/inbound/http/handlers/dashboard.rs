use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::dashboard::models::DashboardSummary;
use crate::domain::dashboard::models::EventSummary;
use crate::domain::dashboard::models::StatusCounts;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<DashboardData>, ApiError> {
    state
        .dashboard_service
        .summarize(&caller.user.id)
        .await
        .map_err(ApiError::from)
        .map(|ref summary| ApiSuccess::new(StatusCode::OK, summary.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardData {
    pub event_count: u64,
    pub guest_count: u64,
    pub confirmed_count: u64,
    pub declined_count: u64,
    pub pending_count: u64,
    pub expected_attendees: u64,
    pub events: Vec<EventSummaryData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummaryData {
    pub event_id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub guest_count: u64,
    pub confirmed_count: u64,
    pub declined_count: u64,
    pub pending_count: u64,
    pub expected_attendees: u64,
}

impl From<&DashboardSummary> for DashboardData {
    fn from(summary: &DashboardSummary) -> Self {
        let StatusCounts {
            guest_count,
            confirmed_count,
            declined_count,
            pending_count,
            expected_attendees,
        } = summary.totals;

        Self {
            event_count: summary.event_count,
            guest_count,
            confirmed_count,
            declined_count,
            pending_count,
            expected_attendees,
            events: summary.events.iter().map(EventSummaryData::from).collect(),
        }
    }
}

impl From<&EventSummary> for EventSummaryData {
    fn from(summary: &EventSummary) -> Self {
        Self {
            event_id: summary.event_id.to_string(),
            title: summary.title.clone(),
            starts_at: summary.starts_at,
            guest_count: summary.counts.guest_count,
            confirmed_count: summary.counts.confirmed_count,
            declined_count: summary.counts.declined_count,
            pending_count: summary.counts.pending_count,
            expected_attendees: summary.counts.expected_attendees,
        }
    }
}
