use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::event::models::Event;
use crate::domain::event::models::EventId;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::errors::NotifierError;
use crate::domain::guest::models::AttendanceStatus;
use crate::domain::guest::models::ContactInfo;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::GuestId;
use crate::domain::guest::models::GuestName;
use crate::domain::guest::models::InvitationToken;
use crate::domain::guest::models::ResponseDetails;

/// Persistence operations for guests.
///
/// The repository is the single source of truth for attendance status.
#[async_trait]
pub trait GuestRepository: Send + Sync + 'static {
    /// Persist a new guest.
    ///
    /// # Errors
    /// * `TokenCollision` - Another guest already holds the token
    /// * `Infrastructure` - Storage operation failed
    async fn insert(&self, guest: Guest) -> Result<Guest, GuestError>;

    async fn find_by_id(&self, id: &GuestId) -> Result<Option<Guest>, GuestError>;

    async fn find_by_token(&self, token: &InvitationToken) -> Result<Option<Guest>, GuestError>;

    async fn token_exists(&self, token: &InvitationToken) -> Result<bool, GuestError>;

    /// Guests of one event, oldest first.
    async fn find_by_event(&self, event_id: &EventId) -> Result<Vec<Guest>, GuestError>;

    /// Guests of several events in one read.
    async fn find_by_events(&self, event_ids: &[EventId]) -> Result<Vec<Guest>, GuestError>;

    async fn count_by_event(&self, event_id: &EventId) -> Result<u64, GuestError>;

    /// Overwrite name and contact only, returning the stored guest.
    ///
    /// # Errors
    /// * `NotFound` - Guest does not exist
    async fn update_profile(
        &self,
        id: &GuestId,
        name: &GuestName,
        contact: &ContactInfo,
    ) -> Result<Guest, GuestError>;

    /// # Errors
    /// * `NotFound` - Guest does not exist
    async fn delete(&self, id: &GuestId) -> Result<(), GuestError>;

    /// Atomically move a guest from `expected` to `new`, stamping the
    /// response time and details.
    ///
    /// # Returns
    /// `false` when the stored status no longer equals `expected`
    ///
    /// # Errors
    /// * `NotFound` - Guest does not exist
    /// * `Infrastructure` - Storage operation failed
    async fn record_response(
        &self,
        id: &GuestId,
        expected: AttendanceStatus,
        new: AttendanceStatus,
        details: &ResponseDetails,
        responded_at: DateTime<Utc>,
    ) -> Result<bool, GuestError>;
}

/// Outbound hook called once an invitation has been issued.
#[async_trait]
pub trait InvitationNotifier: Send + Sync + 'static {
    async fn notify_invited(&self, guest: &Guest, event: &Event) -> Result<(), NotifierError>;
}
