use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::confirmation::errors::ConfirmationError;
use crate::domain::confirmation::models::InvitationView;
use crate::domain::confirmation::ports::ConfirmationServicePort;
use crate::domain::event::models::Event;
use crate::domain::event::ports::EventRepository;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::ResponseDetails;
use crate::domain::guest::models::RsvpDecision;
use crate::domain::guest::models::Transition;
use crate::domain::guest::ports::GuestRepository;
use crate::domain::guest::token::InvitationTokenEngine;

/// Compare-and-swap rounds before giving up on a guest whose status keeps
/// changing underneath us.
const MAX_CAS_ROUNDS: usize = 3;

/// Applies guest decisions through the confirmation state machine.
pub struct ConfirmationService<GR, ER>
where
    GR: GuestRepository,
    ER: EventRepository,
{
    guests: Arc<GR>,
    events: Arc<ER>,
    tokens: InvitationTokenEngine<GR>,
}

impl<GR, ER> ConfirmationService<GR, ER>
where
    GR: GuestRepository,
    ER: EventRepository,
{
    pub fn new(guests: Arc<GR>, events: Arc<ER>) -> Self {
        Self {
            tokens: InvitationTokenEngine::new(Arc::clone(&guests)),
            guests,
            events,
        }
    }

    async fn event_of(&self, guest: &Guest) -> Result<Event, ConfirmationError> {
        self.events
            .find_by_id(&guest.event_id)
            .await?
            .ok_or(ConfirmationError::TokenNotFound)
    }
}

#[async_trait]
impl<GR, ER> ConfirmationServicePort for ConfirmationService<GR, ER>
where
    GR: GuestRepository,
    ER: EventRepository,
{
    async fn resolve(&self, token: &str) -> Result<InvitationView, ConfirmationError> {
        let guest = self.tokens.resolve(token).await?;
        let event = self.event_of(&guest).await?;
        Ok(InvitationView { guest, event })
    }

    async fn confirm(
        &self,
        token: &str,
        details: ResponseDetails,
    ) -> Result<Guest, ConfirmationError> {
        self.respond(token, RsvpDecision::Confirm, details).await
    }

    async fn decline(
        &self,
        token: &str,
        details: ResponseDetails,
    ) -> Result<Guest, ConfirmationError> {
        self.respond(token, RsvpDecision::Decline, details).await
    }

    async fn respond(
        &self,
        token: &str,
        decision: RsvpDecision,
        details: ResponseDetails,
    ) -> Result<Guest, ConfirmationError> {
        let mut guest = self.tokens.resolve(token).await?;
        let event = self.event_of(&guest).await?;

        let now = Utc::now();
        if event.is_closed(now) {
            if let Some(deadline) = event.rsvp_deadline {
                return Err(ConfirmationError::Closed { deadline });
            }
        }

        for _ in 0..MAX_CAS_ROUNDS {
            match guest.status.transition(decision) {
                Transition::Unchanged => return Ok(guest),
                Transition::Conflict(current) => {
                    return Err(ConfirmationError::ConflictingState { current })
                }
                Transition::Applied(new) => {
                    let swapped = self
                        .guests
                        .record_response(&guest.id, guest.status, new, &details, now)
                        .await?;

                    if swapped {
                        tracing::info!(
                            event_id = %guest.event_id,
                            guest_id = %guest.id,
                            status = %new,
                            "Recorded invitation response"
                        );
                        guest.status = new;
                        guest.responded_at = Some(now);
                        guest.details = details;
                        return Ok(guest);
                    }

                    tracing::debug!(guest_id = %guest.id, "Lost response race, re-reading guest");
                    guest = self
                        .guests
                        .find_by_id(&guest.id)
                        .await?
                        .ok_or(ConfirmationError::TokenNotFound)?;
                }
            }
        }

        Err(ConfirmationError::Unknown(format!(
            "status of guest {} kept changing during response",
            guest.id
        )))
    }
}
