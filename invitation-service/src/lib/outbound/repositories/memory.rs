use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::event::errors::EventError;
use crate::domain::event::models::Event;
use crate::domain::event::models::EventId;
use crate::domain::event::ports::EventRepository;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::models::AttendanceStatus;
use crate::domain::guest::models::ContactInfo;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::GuestId;
use crate::domain::guest::models::GuestName;
use crate::domain::guest::models::InvitationToken;
use crate::domain::guest::models::ResponseDetails;
use crate::domain::guest::ports::GuestRepository;
use crate::domain::session::errors::AuthError;
use crate::domain::session::models::Session;
use crate::domain::session::ports::SessionStore;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::CredentialStore;

/// Process-local storage implementing every persistence port.
///
/// Clones share the same state. Each operation holds the lock for its whole
/// duration, so status changes are atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    sessions: HashMap<String, Session>,
    events: HashMap<EventId, Event>,
    // Insertion order doubles as creation order.
    guests: Vec<Guest>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.users.get(&user.id) {
            return Ok(existing.clone());
        }
        if state.users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == *username)
            .cloned())
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: String,
    ) -> Result<(), UserError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        user.password_hash = password_hash;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn create(&self, session: Session) -> Result<Session, AuthError> {
        self.state
            .write()
            .await
            .sessions
            .insert(session.token_digest.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_digest(&self, token_digest: &str) -> Result<Option<Session>, AuthError> {
        Ok(self.state.read().await.sessions.get(token_digest).cloned())
    }

    async fn delete_by_digest(&self, token_digest: &str) -> Result<bool, AuthError> {
        Ok(self
            .state
            .write()
            .await
            .sessions
            .remove(token_digest)
            .is_some())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> Result<u64, AuthError> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.user_id != *user_id);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - state.sessions.len()) as u64)
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn create(&self, event: Event) -> Result<Event, EventError> {
        let mut state = self.state.write().await;
        let stored = state.events.entry(event.id).or_insert(event);
        Ok(stored.clone())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventError> {
        Ok(self.state.read().await.events.get(id).cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Event>, EventError> {
        let state = self.state.read().await;
        let mut events: Vec<Event> = state
            .events
            .values()
            .filter(|e| e.is_owned_by(owner))
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.starts_at
                .cmp(&b.starts_at)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(events)
    }

    async fn update(&self, event: Event) -> Result<Event, EventError> {
        let mut state = self.state.write().await;
        let stored = state
            .events
            .get_mut(&event.id)
            .ok_or_else(|| EventError::NotFound(event.id.to_string()))?;
        *stored = event.clone();
        Ok(event)
    }

    async fn delete(&self, id: &EventId) -> Result<(), EventError> {
        let mut state = self.state.write().await;
        if state.events.remove(id).is_none() {
            return Err(EventError::NotFound(id.to_string()));
        }
        state.guests.retain(|g| g.event_id != *id);
        Ok(())
    }
}

#[async_trait]
impl GuestRepository for InMemoryStore {
    async fn insert(&self, guest: Guest) -> Result<Guest, GuestError> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.guests.iter().find(|g| g.id == guest.id) {
            return Ok(existing.clone());
        }
        if state.guests.iter().any(|g| g.token == guest.token) {
            return Err(GuestError::TokenCollision);
        }

        state.guests.push(guest.clone());
        Ok(guest)
    }

    async fn find_by_id(&self, id: &GuestId) -> Result<Option<Guest>, GuestError> {
        Ok(self
            .state
            .read()
            .await
            .guests
            .iter()
            .find(|g| g.id == *id)
            .cloned())
    }

    async fn find_by_token(&self, token: &InvitationToken) -> Result<Option<Guest>, GuestError> {
        Ok(self
            .state
            .read()
            .await
            .guests
            .iter()
            .find(|g| g.token == *token)
            .cloned())
    }

    async fn token_exists(&self, token: &InvitationToken) -> Result<bool, GuestError> {
        Ok(self
            .state
            .read()
            .await
            .guests
            .iter()
            .any(|g| g.token == *token))
    }

    async fn find_by_event(&self, event_id: &EventId) -> Result<Vec<Guest>, GuestError> {
        Ok(self
            .state
            .read()
            .await
            .guests
            .iter()
            .filter(|g| g.event_id == *event_id)
            .cloned()
            .collect())
    }

    async fn find_by_events(&self, event_ids: &[EventId]) -> Result<Vec<Guest>, GuestError> {
        Ok(self
            .state
            .read()
            .await
            .guests
            .iter()
            .filter(|g| event_ids.contains(&g.event_id))
            .cloned()
            .collect())
    }

    async fn count_by_event(&self, event_id: &EventId) -> Result<u64, GuestError> {
        Ok(self
            .state
            .read()
            .await
            .guests
            .iter()
            .filter(|g| g.event_id == *event_id)
            .count() as u64)
    }

    async fn update_profile(
        &self,
        id: &GuestId,
        name: &GuestName,
        contact: &ContactInfo,
    ) -> Result<Guest, GuestError> {
        let mut state = self.state.write().await;
        let guest = state
            .guests
            .iter_mut()
            .find(|g| g.id == *id)
            .ok_or_else(|| GuestError::NotFound(id.to_string()))?;

        guest.name = name.clone();
        guest.contact = contact.clone();
        Ok(guest.clone())
    }

    async fn delete(&self, id: &GuestId) -> Result<(), GuestError> {
        let mut state = self.state.write().await;
        let before = state.guests.len();
        state.guests.retain(|g| g.id != *id);
        if state.guests.len() == before {
            return Err(GuestError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn record_response(
        &self,
        id: &GuestId,
        expected: AttendanceStatus,
        new: AttendanceStatus,
        details: &ResponseDetails,
        responded_at: DateTime<Utc>,
    ) -> Result<bool, GuestError> {
        let mut state = self.state.write().await;
        let guest = state
            .guests
            .iter_mut()
            .find(|g| g.id == *id)
            .ok_or_else(|| GuestError::NotFound(id.to_string()))?;

        if guest.status != expected {
            return Ok(false);
        }

        guest.status = new;
        guest.responded_at = Some(responded_at);
        guest.details = details.clone();
        Ok(true)
    }
}
