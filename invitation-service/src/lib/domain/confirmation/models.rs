use crate::domain::event::models::Event;
use crate::domain::guest::models::Guest;

/// What a guest sees when opening an invitation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationView {
    pub guest: Guest,
    pub event: Event,
}
