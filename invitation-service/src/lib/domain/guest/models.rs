use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::event::models::EventId;
use crate::domain::guest::errors::AttendanceStatusError;
use crate::domain::guest::errors::GuestIdError;
use crate::domain::guest::errors::GuestNameError;
use crate::domain::guest::errors::PhoneNumberError;
use crate::domain::guest::errors::ResponseDetailsError;
use crate::domain::user::models::EmailAddress;

/// Guest aggregate entity.
///
/// A person invited to one event. The invitation token never changes once
/// issued and the status only ever leaves `Pending` once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    pub id: GuestId,
    pub event_id: EventId,
    pub name: GuestName,
    pub contact: ContactInfo,
    pub token: InvitationToken,
    pub status: AttendanceStatus,
    pub responded_at: Option<DateTime<Utc>>,
    pub details: ResponseDetails,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    /// Headcount this guest contributes to the event.
    pub fn expected_attendees(&self) -> u32 {
        match self.status {
            AttendanceStatus::Confirmed => 1 + self.details.additional_guests,
            AttendanceStatus::Pending | AttendanceStatus::Declined => 0,
        }
    }
}

/// Guest unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuestId(pub Uuid);

impl GuestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a guest ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, GuestIdError> {
        Uuid::parse_str(s)
            .map(GuestId)
            .map_err(|e| GuestIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestName(String);

impl GuestName {
    const MAX_LENGTH: usize = 200;

    pub fn new(name: String) -> Result<Self, GuestNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length == 0 {
            Err(GuestNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(GuestNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Phone number value type
///
/// Accepts digits with an optional leading `+` and the separators space,
/// `-`, `.`, `(` and `)`; requires 5 to 20 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_DIGITS: usize = 5;
    const MAX_DIGITS: usize = 20;

    pub fn new(phone: String) -> Result<Self, PhoneNumberError> {
        let phone = phone.trim().to_string();
        let body = phone.strip_prefix('+').unwrap_or(&phone);

        if !body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '.' | '(' | ')'))
        {
            return Err(PhoneNumberError::InvalidFormat(phone));
        }

        let digits = body.chars().filter(char::is_ascii_digit).count();
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneNumberError::InvalidFormat(phone));
        }

        Ok(Self(phone))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional ways to reach a guest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
}

/// Opaque invitation token.
///
/// Only minted by the token engine or loaded back from storage.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InvitationToken(String);

impl InvitationToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters only, safe to write to logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(6).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Debug for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InvitationToken({})", self.redacted())
    }
}

impl fmt::Display for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Attendance status of a guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    Pending,
    Confirmed,
    Declined,
}

/// Decision submitted through an invitation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpDecision {
    Confirm,
    Decline,
}

impl RsvpDecision {
    pub fn target(&self) -> AttendanceStatus {
        match self {
            RsvpDecision::Confirm => AttendanceStatus::Confirmed,
            RsvpDecision::Decline => AttendanceStatus::Declined,
        }
    }
}

/// Outcome of applying a decision to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Status moves to the contained terminal state.
    Applied(AttendanceStatus),
    /// Status already equals the decision's target.
    Unchanged,
    /// Status is the other terminal state.
    Conflict(AttendanceStatus),
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Pending => "pending",
            AttendanceStatus::Confirmed => "confirmed",
            AttendanceStatus::Declined => "declined",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttendanceStatus::Pending)
    }

    /// Pure transition function of the confirmation state machine.
    pub fn transition(self, decision: RsvpDecision) -> Transition {
        let target = decision.target();
        match self {
            AttendanceStatus::Pending => Transition::Applied(target),
            current if current == target => Transition::Unchanged,
            current => Transition::Conflict(current),
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = AttendanceStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AttendanceStatus::Pending),
            "confirmed" => Ok(AttendanceStatus::Confirmed),
            "declined" => Ok(AttendanceStatus::Declined),
            other => Err(AttendanceStatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional details recorded with the first response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDetails {
    pub additional_guests: u32,
    pub notes: Option<String>,
}

impl ResponseDetails {
    pub const MAX_ADDITIONAL_GUESTS: u32 = 20;
    pub const MAX_NOTES_LENGTH: usize = 1000;

    /// Blank notes are dropped.
    ///
    /// # Errors
    /// * `TooManyAdditionalGuests` - More than 20 additional guests
    /// * `NotesTooLong` - Notes exceed 1000 characters
    pub fn new(additional_guests: u32, notes: Option<String>) -> Result<Self, ResponseDetailsError> {
        if additional_guests > Self::MAX_ADDITIONAL_GUESTS {
            return Err(ResponseDetailsError::TooManyAdditionalGuests {
                max: Self::MAX_ADDITIONAL_GUESTS,
                actual: additional_guests,
            });
        }

        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(ref n) = notes {
            let length = n.chars().count();
            if length > Self::MAX_NOTES_LENGTH {
                return Err(ResponseDetailsError::NotesTooLong {
                    max: Self::MAX_NOTES_LENGTH,
                    actual: length,
                });
            }
        }

        Ok(Self {
            additional_guests,
            notes,
        })
    }
}

/// Command to invite a guest to an event
#[derive(Debug, Clone)]
pub struct AddGuestCommand {
    pub name: GuestName,
    pub contact: ContactInfo,
}

impl AddGuestCommand {
    pub fn new(name: GuestName, contact: ContactInfo) -> Self {
        Self { name, contact }
    }
}

/// Owner edit of a guest's profile; absent fields are left untouched.
///
/// Status, token and response details are not reachable from here.
#[derive(Debug, Clone, Default)]
pub struct UpdateGuestCommand {
    pub name: Option<GuestName>,
    pub email: Option<EmailAddress>,
    pub phone: Option<PhoneNumber>,
}

impl Guest {
    /// Name and contact after applying `command`.
    pub fn edited_profile(&self, command: UpdateGuestCommand) -> (GuestName, ContactInfo) {
        let name = command.name.unwrap_or_else(|| self.name.clone());
        let contact = ContactInfo {
            email: command.email.or_else(|| self.contact.email.clone()),
            phone: command.phone.or_else(|| self.contact.phone.clone()),
        };
        (name, contact)
    }
}
