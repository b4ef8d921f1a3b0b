use async_trait::async_trait;

use crate::domain::confirmation::errors::ConfirmationError;
use crate::domain::confirmation::models::InvitationView;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::ResponseDetails;
use crate::domain::guest::models::RsvpDecision;

/// Port for the unauthenticated invitation flow.
///
/// A terminal status is never left. Repeating the decision that produced it
/// succeeds without changes; the opposite decision fails.
#[async_trait]
pub trait ConfirmationServicePort: Send + Sync + 'static {
    /// Read-only view of an invitation.
    ///
    /// # Errors
    /// * `TokenNotFound` - Token is malformed or unknown
    async fn resolve(&self, token: &str) -> Result<InvitationView, ConfirmationError>;

    /// Accept an invitation.
    ///
    /// # Errors
    /// * `TokenNotFound` - Token is malformed or unknown
    /// * `Closed` - The event's response deadline has passed
    /// * `ConflictingState` - The invitation was already declined
    async fn confirm(&self, token: &str, details: ResponseDetails)
        -> Result<Guest, ConfirmationError>;

    /// Turn down an invitation.
    ///
    /// # Errors
    /// * `TokenNotFound` - Token is malformed or unknown
    /// * `Closed` - The event's response deadline has passed
    /// * `ConflictingState` - The invitation was already confirmed
    async fn decline(&self, token: &str, details: ResponseDetails)
        -> Result<Guest, ConfirmationError>;

    /// Apply either decision.
    async fn respond(
        &self,
        token: &str,
        decision: RsvpDecision,
        details: ResponseDetails,
    ) -> Result<Guest, ConfirmationError>;
}
