use async_trait::async_trait;

use crate::domain::event::models::Event;
use crate::domain::guest::errors::NotifierError;
use crate::domain::guest::models::Guest;
use crate::domain::guest::ports::InvitationNotifier;

/// Notifier that records each invitation link in the service log.
///
/// Stands in for real delivery channels such as email or SMS.
#[derive(Debug, Clone)]
pub struct LoggingNotifier {
    public_base_url: String,
}

impl LoggingNotifier {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
        }
    }

    /// Confirmation link with the token cut short. The full link is a
    /// bearer capability and stays out of the log.
    pub fn redacted_url(&self, guest: &Guest) -> String {
        confirmation_url(&self.public_base_url, &guest.token.redacted())
    }
}

/// Link a guest follows to answer an invitation.
pub fn confirmation_url(public_base_url: &str, token: &str) -> String {
    format!(
        "{}/api/confirm/{}",
        public_base_url.trim_end_matches('/'),
        token
    )
}

#[async_trait]
impl InvitationNotifier for LoggingNotifier {
    async fn notify_invited(&self, guest: &Guest, event: &Event) -> Result<(), NotifierError> {
        let channel = match (&guest.contact.email, &guest.contact.phone) {
            (Some(_), _) => "email",
            (None, Some(_)) => "phone",
            (None, None) => "none",
        };

        tracing::info!(
            event_id = %event.id,
            guest_id = %guest.id,
            guest = %guest.name,
            channel,
            url = %self.redacted_url(guest),
            "Invitation issued"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::event::models::EventId;
    use crate::domain::guest::models::AttendanceStatus;
    use crate::domain::guest::models::ContactInfo;
    use crate::domain::guest::models::GuestId;
    use crate::domain::guest::models::GuestName;
    use crate::domain::guest::models::InvitationToken;
    use crate::domain::guest::models::ResponseDetails;

    #[test]
    fn test_confirmation_url_joins_without_double_slash() {
        assert_eq!(
            confirmation_url("https://rsvp.example.com/", "abc"),
            "https://rsvp.example.com/api/confirm/abc"
        );
        assert_eq!(
            confirmation_url("http://localhost:3000", "abc"),
            "http://localhost:3000/api/confirm/abc"
        );
    }

    #[test]
    fn test_logged_url_does_not_carry_full_token() {
        let token = "Zk3pQ8v1_Lm2nB7xR4tY6uI9oP0aS5dF3gH1jK8lW2e";
        let guest = Guest {
            id: GuestId::new(),
            event_id: EventId::new(),
            name: GuestName::new("Judy".to_string()).unwrap(),
            contact: ContactInfo::default(),
            token: InvitationToken::new(token.to_string()),
            status: AttendanceStatus::Pending,
            responded_at: None,
            details: ResponseDetails::default(),
            created_at: Utc::now(),
        };

        let notifier = LoggingNotifier::new("https://rsvp.example.com");
        let url = notifier.redacted_url(&guest);

        assert!(url.starts_with("https://rsvp.example.com/api/confirm/Zk3pQ8"));
        assert!(!url.contains(token));
        assert!(!format!("{:?}", guest).contains(token));
    }
}
