use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::event::errors::EventError;
use crate::domain::event::models::CreateEventCommand;
use crate::domain::event::models::Event;
use crate::domain::event::models::EventId;
use crate::domain::event::models::UpdateEventCommand;
use crate::domain::event::ports::EventRepository;
use crate::domain::event::ports::EventServicePort;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::models::AddGuestCommand;
use crate::domain::guest::models::AttendanceStatus;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::GuestId;
use crate::domain::guest::models::ResponseDetails;
use crate::domain::guest::models::UpdateGuestCommand;
use crate::domain::guest::ports::GuestRepository;
use crate::domain::guest::ports::InvitationNotifier;
use crate::domain::guest::token::InvitationTokenEngine;
use crate::domain::user::models::UserId;

/// Domain service for events and their guest lists.
pub struct EventService<ER, GR, N>
where
    ER: EventRepository,
    GR: GuestRepository,
    N: InvitationNotifier,
{
    events: Arc<ER>,
    guests: Arc<GR>,
    tokens: InvitationTokenEngine<GR>,
    notifier: Arc<N>,
}

impl<ER, GR, N> EventService<ER, GR, N>
where
    ER: EventRepository,
    GR: GuestRepository,
    N: InvitationNotifier,
{
    /// Create a new event service with injected dependencies.
    ///
    /// # Arguments
    /// * `events` - Event persistence implementation
    /// * `guests` - Guest persistence implementation, also used for token lookups
    /// * `notifier` - Invitation hook called after a guest is stored
    pub fn new(events: Arc<ER>, guests: Arc<GR>, notifier: Arc<N>) -> Self {
        Self {
            events,
            tokens: InvitationTokenEngine::new(Arc::clone(&guests)),
            guests,
            notifier,
        }
    }

    async fn owned_event(&self, owner: &UserId, event_id: &EventId) -> Result<Event, EventError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| EventError::NotFound(event_id.to_string()))?;

        if !event.is_owned_by(owner) {
            tracing::warn!(user_id = %owner, event_id = %event_id, "Rejected access to foreign event");
            return Err(EventError::Forbidden {
                user_id: *owner,
                event_id: event_id.to_string(),
            });
        }

        Ok(event)
    }

    /// Guest whose event belongs to `owner`.
    async fn owned_guest(&self, owner: &UserId, guest_id: &GuestId) -> Result<Guest, EventError> {
        let guest = self
            .guests
            .find_by_id(guest_id)
            .await?
            .ok_or_else(|| EventError::GuestNotFound(guest_id.to_string()))?;

        self.owned_event(owner, &guest.event_id).await?;
        Ok(guest)
    }

    async fn insert_with_fresh_token(
        &self,
        event: &Event,
        command: AddGuestCommand,
    ) -> Result<Guest, EventError> {
        let max_attempts = InvitationTokenEngine::<GR>::MAX_MINT_ATTEMPTS;

        for attempt in 1..=max_attempts {
            let guest = Guest {
                id: GuestId::new(),
                event_id: event.id,
                name: command.name.clone(),
                contact: command.contact.clone(),
                token: self.tokens.mint().await?,
                status: AttendanceStatus::Pending,
                responded_at: None,
                details: ResponseDetails::default(),
                created_at: Utc::now(),
            };

            match self.guests.insert(guest).await {
                Ok(stored) => return Ok(stored),
                Err(GuestError::TokenCollision) => {
                    tracing::warn!(event_id = %event.id, attempt, "Token taken at insert, re-minting");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(EventError::TokenSpaceExhausted {
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl<ER, GR, N> EventServicePort for EventService<ER, GR, N>
where
    ER: EventRepository,
    GR: GuestRepository,
    N: InvitationNotifier,
{
    async fn create_event(
        &self,
        owner: &UserId,
        command: CreateEventCommand,
    ) -> Result<Event, EventError> {
        let now = Utc::now();
        let event = Event {
            id: EventId::new(),
            owner_id: *owner,
            title: command.title,
            description: command.description,
            starts_at: command.starts_at,
            location: command.location,
            max_guests: command.max_guests,
            rsvp_deadline: command.rsvp_deadline,
            created_at: now,
            updated_at: now,
        };

        let created = self.events.create(event).await?;
        tracing::info!(user_id = %owner, event_id = %created.id, "Created event");

        Ok(created)
    }

    async fn get_event(&self, owner: &UserId, event_id: &EventId) -> Result<Event, EventError> {
        self.owned_event(owner, event_id).await
    }

    async fn list_events(&self, owner: &UserId) -> Result<Vec<Event>, EventError> {
        self.events.find_by_owner(owner).await
    }

    async fn update_event(
        &self,
        owner: &UserId,
        event_id: &EventId,
        command: UpdateEventCommand,
    ) -> Result<Event, EventError> {
        let mut event = self.owned_event(owner, event_id).await?;
        event.apply(command, Utc::now());

        let updated = self.events.update(event).await?;
        tracing::info!(user_id = %owner, event_id = %event_id, "Updated event");

        Ok(updated)
    }

    async fn delete_event(&self, owner: &UserId, event_id: &EventId) -> Result<(), EventError> {
        self.owned_event(owner, event_id).await?;
        self.events.delete(event_id).await?;
        tracing::info!(user_id = %owner, event_id = %event_id, "Deleted event and its guests");
        Ok(())
    }

    async fn add_guest(
        &self,
        owner: &UserId,
        event_id: &EventId,
        command: AddGuestCommand,
    ) -> Result<Guest, EventError> {
        let event = self.owned_event(owner, event_id).await?;

        if let Some(capacity) = event.max_guests {
            let invited = self.guests.count_by_event(event_id).await?;
            if invited >= u64::from(capacity.get()) {
                return Err(EventError::CapacityReached {
                    event_id: event_id.to_string(),
                    capacity: capacity.get(),
                });
            }
        }

        let guest = self.insert_with_fresh_token(&event, command).await?;
        tracing::info!(event_id = %event_id, guest_id = %guest.id, "Invited guest");

        if let Err(e) = self.notifier.notify_invited(&guest, &event).await {
            tracing::error!(
                "Failed to notify guest {} of event {}: {}",
                guest.id,
                event.id,
                e
            );
        }

        Ok(guest)
    }

    async fn list_guests(
        &self,
        owner: &UserId,
        event_id: &EventId,
    ) -> Result<Vec<Guest>, EventError> {
        self.owned_event(owner, event_id).await?;
        Ok(self.guests.find_by_event(event_id).await?)
    }

    async fn get_guest(&self, owner: &UserId, guest_id: &GuestId) -> Result<Guest, EventError> {
        self.owned_guest(owner, guest_id).await
    }

    async fn update_guest(
        &self,
        owner: &UserId,
        guest_id: &GuestId,
        command: UpdateGuestCommand,
    ) -> Result<Guest, EventError> {
        let guest = self.owned_guest(owner, guest_id).await?;
        let (name, contact) = guest.edited_profile(command);

        let updated = self
            .guests
            .update_profile(guest_id, &name, &contact)
            .await?;
        tracing::info!(event_id = %guest.event_id, guest_id = %guest_id, "Updated guest");

        Ok(updated)
    }

    async fn remove_guest(&self, owner: &UserId, guest_id: &GuestId) -> Result<(), EventError> {
        let guest = self.owned_guest(owner, guest_id).await?;
        self.guests.delete(guest_id).await?;
        tracing::info!(event_id = %guest.event_id, guest_id = %guest_id, "Removed guest");

        Ok(())
    }
}
