use async_trait::async_trait;

use crate::domain::event::errors::EventError;
use crate::domain::event::models::CreateEventCommand;
use crate::domain::event::models::Event;
use crate::domain::event::models::EventId;
use crate::domain::event::models::UpdateEventCommand;
use crate::domain::guest::models::AddGuestCommand;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::GuestId;
use crate::domain::guest::models::UpdateGuestCommand;
use crate::domain::user::models::UserId;

/// Port for event and guest-list operations.
///
/// Every operation takes the acting owner explicitly and checks it before
/// reading or mutating anything beyond the event itself.
#[async_trait]
pub trait EventServicePort: Send + Sync + 'static {
    /// Create an event owned by `owner`.
    ///
    /// # Errors
    /// * `Infrastructure` - Storage operation failed
    async fn create_event(
        &self,
        owner: &UserId,
        command: CreateEventCommand,
    ) -> Result<Event, EventError>;

    /// # Errors
    /// * `NotFound` - Event does not exist
    /// * `Forbidden` - Event belongs to another user
    async fn get_event(&self, owner: &UserId, event_id: &EventId) -> Result<Event, EventError>;

    /// Events of `owner`, soonest first.
    async fn list_events(&self, owner: &UserId) -> Result<Vec<Event>, EventError>;

    /// Apply a partial update.
    ///
    /// # Errors
    /// * `NotFound` - Event does not exist
    /// * `Forbidden` - Event belongs to another user
    async fn update_event(
        &self,
        owner: &UserId,
        event_id: &EventId,
        command: UpdateEventCommand,
    ) -> Result<Event, EventError>;

    /// Delete an event together with its guests.
    ///
    /// # Errors
    /// * `NotFound` - Event does not exist
    /// * `Forbidden` - Event belongs to another user
    async fn delete_event(&self, owner: &UserId, event_id: &EventId) -> Result<(), EventError>;

    /// Invite a guest and mint their invitation token.
    ///
    /// # Arguments
    /// * `owner` - Acting user
    /// * `event_id` - Event to invite to
    /// * `command` - Validated guest name and contact details
    ///
    /// # Returns
    /// Stored guest in `Pending` state
    ///
    /// # Errors
    /// * `NotFound` - Event does not exist
    /// * `Forbidden` - Event belongs to another user
    /// * `CapacityReached` - Event already has `max_guests` guests
    /// * `Infrastructure` - Storage operation failed
    async fn add_guest(
        &self,
        owner: &UserId,
        event_id: &EventId,
        command: AddGuestCommand,
    ) -> Result<Guest, EventError>;

    /// # Errors
    /// * `NotFound` - Event does not exist
    /// * `Forbidden` - Event belongs to another user
    async fn list_guests(&self, owner: &UserId, event_id: &EventId)
        -> Result<Vec<Guest>, EventError>;

    /// # Errors
    /// * `GuestNotFound` - Guest does not exist
    /// * `Forbidden` - Guest's event belongs to another user
    async fn get_guest(&self, owner: &UserId, guest_id: &GuestId) -> Result<Guest, EventError>;

    /// Correct a guest's name or contact details.
    ///
    /// The invitation token, attendance status and response details are
    /// never changed.
    ///
    /// # Errors
    /// * `GuestNotFound` - Guest does not exist
    /// * `Forbidden` - Guest's event belongs to another user
    async fn update_guest(
        &self,
        owner: &UserId,
        guest_id: &GuestId,
        command: UpdateGuestCommand,
    ) -> Result<Guest, EventError>;

    /// # Errors
    /// * `GuestNotFound` - Guest does not exist
    /// * `Forbidden` - Guest's event belongs to another user
    async fn remove_guest(&self, owner: &UserId, guest_id: &GuestId) -> Result<(), EventError>;
}

/// Persistence operations for events.
#[async_trait]
pub trait EventRepository: Send + Sync + 'static {
    async fn create(&self, event: Event) -> Result<Event, EventError>;

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventError>;

    /// Events of one owner ordered by start time.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Event>, EventError>;

    /// # Errors
    /// * `NotFound` - Event does not exist
    async fn update(&self, event: Event) -> Result<Event, EventError>;

    /// Remove an event and every guest of it.
    ///
    /// # Errors
    /// * `NotFound` - Event does not exist
    async fn delete(&self, id: &EventId) -> Result<(), EventError>;
}
