use std::sync::Arc;

use auth::TokenGenerator;

use crate::domain::guest::errors::GuestError;
use crate::domain::guest::errors::TokenError;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::InvitationToken;
use crate::domain::guest::ports::GuestRepository;

/// Mints and resolves invitation tokens.
///
/// Tokens are 256 random bits, URL-safe base64 without padding, and carry
/// no expiry.
pub struct InvitationTokenEngine<GR>
where
    GR: GuestRepository,
{
    repository: Arc<GR>,
    generator: TokenGenerator,
}

impl<GR> InvitationTokenEngine<GR>
where
    GR: GuestRepository,
{
    pub const MAX_MINT_ATTEMPTS: usize = 5;

    pub fn new(repository: Arc<GR>) -> Self {
        Self {
            repository,
            generator: TokenGenerator::new(),
        }
    }

    /// Mint a token not yet held by any guest.
    ///
    /// # Errors
    /// * `TokenSpaceExhausted` - Every attempt collided
    /// * `Infrastructure` - Storage operation failed
    pub async fn mint(&self) -> Result<InvitationToken, GuestError> {
        for attempt in 1..=Self::MAX_MINT_ATTEMPTS {
            let token = self.mint_unchecked()?;
            if !self.repository.token_exists(&token).await? {
                return Ok(token);
            }
            tracing::warn!(attempt, "Invitation token collision, re-minting");
        }

        Err(GuestError::TokenSpaceExhausted {
            attempts: Self::MAX_MINT_ATTEMPTS,
        })
    }

    /// Fresh random token without the uniqueness lookup.
    pub fn mint_unchecked(&self) -> Result<InvitationToken, GuestError> {
        self.generator
            .generate()
            .map(InvitationToken::new)
            .map_err(|e| GuestError::Unknown(e.to_string()))
    }

    /// Look up the guest holding a token.
    ///
    /// Malformed tokens are rejected without a storage read.
    ///
    /// # Errors
    /// * `NotFound` - No guest holds the token
    /// * `Infrastructure` - Storage operation failed
    pub async fn resolve(&self, token: &str) -> Result<Guest, TokenError> {
        if !self.generator.is_well_formed(token) {
            return Err(TokenError::NotFound);
        }

        self.repository
            .find_by_token(&InvitationToken::new(token.to_string()))
            .await?
            .ok_or(TokenError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use async_trait::async_trait;

    use crate::domain::errors::InfrastructureError;
    use crate::domain::event::models::EventId;
    use crate::domain::guest::models::AttendanceStatus;
    use crate::domain::guest::models::ContactInfo;
    use crate::domain::guest::models::GuestId;
    use crate::domain::guest::models::GuestName;
    use crate::domain::guest::models::ResponseDetails;

    mock! {
        pub TestGuestRepository {}

        #[async_trait]
        impl GuestRepository for TestGuestRepository {
            async fn insert(&self, guest: Guest) -> Result<Guest, GuestError>;
            async fn find_by_id(&self, id: &GuestId) -> Result<Option<Guest>, GuestError>;
            async fn find_by_token(&self, token: &InvitationToken) -> Result<Option<Guest>, GuestError>;
            async fn token_exists(&self, token: &InvitationToken) -> Result<bool, GuestError>;
            async fn find_by_event(&self, event_id: &EventId) -> Result<Vec<Guest>, GuestError>;
            async fn find_by_events(&self, event_ids: &[EventId]) -> Result<Vec<Guest>, GuestError>;
            async fn count_by_event(&self, event_id: &EventId) -> Result<u64, GuestError>;
            async fn update_profile(
                &self,
                id: &GuestId,
                name: &GuestName,
                contact: &ContactInfo,
            ) -> Result<Guest, GuestError>;
            async fn delete(&self, id: &GuestId) -> Result<(), GuestError>;
            async fn record_response(
                &self,
                id: &GuestId,
                expected: AttendanceStatus,
                new: AttendanceStatus,
                details: &ResponseDetails,
                responded_at: DateTime<Utc>,
            ) -> Result<bool, GuestError>;
        }
    }

    fn guest_with(token: InvitationToken) -> Guest {
        Guest {
            id: GuestId::new(),
            event_id: EventId::new(),
            name: GuestName::new("Carol".to_string()).unwrap(),
            contact: ContactInfo::default(),
            token,
            status: AttendanceStatus::Pending,
            responded_at: None,
            details: ResponseDetails::default(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_mint_produces_url_safe_256_bit_token() {
        let mut repository = MockTestGuestRepository::new();
        repository
            .expect_token_exists()
            .times(1)
            .returning(|_| Ok(false));

        let engine = InvitationTokenEngine::new(Arc::new(repository));
        let token = engine.mint().await.unwrap();

        assert_eq!(token.as_str().len(), 43);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn test_mint_retries_on_collision() {
        let mut repository = MockTestGuestRepository::new();
        let mut seq = mockall::Sequence::new();
        repository
            .expect_token_exists()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        repository
            .expect_token_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));

        let engine = InvitationTokenEngine::new(Arc::new(repository));
        assert!(engine.mint().await.is_ok());
    }

    #[tokio::test]
    async fn test_mint_gives_up_after_bounded_attempts() {
        let mut repository = MockTestGuestRepository::new();
        repository
            .expect_token_exists()
            .times(InvitationTokenEngine::<MockTestGuestRepository>::MAX_MINT_ATTEMPTS)
            .returning(|_| Ok(true));

        let engine = InvitationTokenEngine::new(Arc::new(repository));
        let result = engine.mint().await;
        assert!(matches!(
            result,
            Err(GuestError::TokenSpaceExhausted { attempts: 5 })
        ));
    }

    #[tokio::test]
    async fn test_minted_tokens_are_distinct() {
        let repository = MockTestGuestRepository::new();
        let engine = InvitationTokenEngine::new(Arc::new(repository));

        let tokens: std::collections::HashSet<_> = (0..256)
            .map(|_| engine.mint_unchecked().unwrap())
            .collect();
        assert_eq!(tokens.len(), 256);
    }

    #[tokio::test]
    async fn test_resolve_known_token() {
        let mut repository = MockTestGuestRepository::new();
        let engine_for_mint = InvitationTokenEngine::new(Arc::new(MockTestGuestRepository::new()));
        let token = engine_for_mint.mint_unchecked().unwrap();
        let guest = guest_with(token.clone());
        let expected_id = guest.id;

        let lookup = token.clone();
        repository
            .expect_find_by_token()
            .withf(move |t| *t == lookup)
            .times(1)
            .returning(move |_| Ok(Some(guest.clone())));

        let engine = InvitationTokenEngine::new(Arc::new(repository));
        let resolved = engine.resolve(token.as_str()).await.unwrap();
        assert_eq!(resolved.id, expected_id);
    }

    #[tokio::test]
    async fn test_resolve_malformed_token_skips_storage() {
        let mut repository = MockTestGuestRepository::new();
        repository.expect_find_by_token().times(0);

        let engine = InvitationTokenEngine::new(Arc::new(repository));
        assert!(matches!(
            engine.resolve("short").await,
            Err(TokenError::NotFound)
        ));
        assert!(matches!(
            engine.resolve(&"*".repeat(43)).await,
            Err(TokenError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_resolve_unknown_token() {
        let mut repository = MockTestGuestRepository::new();
        repository
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(None));

        let engine = InvitationTokenEngine::new(Arc::new(repository));
        let result = engine.resolve(&"A".repeat(43)).await;
        assert!(matches!(result, Err(TokenError::NotFound)));
    }

    #[tokio::test]
    async fn test_resolve_surfaces_infrastructure_failure() {
        let mut repository = MockTestGuestRepository::new();
        repository.expect_find_by_token().times(1).returning(|_| {
            Err(GuestError::Infrastructure(InfrastructureError::Timeout {
                operation: "find_guest_by_token",
                timeout_ms: 50,
            }))
        });

        let engine = InvitationTokenEngine::new(Arc::new(repository));
        let result = engine.resolve(&"A".repeat(43)).await;
        assert!(matches!(result, Err(TokenError::Infrastructure(_))));
    }
}
