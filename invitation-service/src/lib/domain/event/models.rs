use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::event::errors::CapacityError;
use crate::domain::event::errors::DescriptionError;
use crate::domain::event::errors::EventIdError;
use crate::domain::event::errors::EventTitleError;
use crate::domain::event::errors::LocationError;
use crate::domain::user::models::UserId;

/// Event aggregate entity.
///
/// Owned by exactly one user. Deleting it removes its guests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub owner_id: UserId,
    pub title: EventTitle,
    pub description: Option<EventDescription>,
    pub starts_at: DateTime<Utc>,
    pub location: Location,
    pub max_guests: Option<GuestCapacity>,
    pub rsvp_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.owner_id == *user_id
    }

    /// Responses are closed strictly after the deadline.
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.rsvp_deadline.is_some_and(|deadline| now > deadline)
    }

    pub fn apply(&mut self, command: UpdateEventCommand, now: DateTime<Utc>) {
        if let Some(title) = command.title {
            self.title = title;
        }
        if let Some(description) = command.description {
            self.description = Some(description);
        }
        if let Some(starts_at) = command.starts_at {
            self.starts_at = starts_at;
        }
        if let Some(location) = command.location {
            self.location = location;
        }
        if let Some(max_guests) = command.max_guests {
            self.max_guests = Some(max_guests);
        }
        if let Some(rsvp_deadline) = command.rsvp_deadline {
            self.rsvp_deadline = Some(rsvp_deadline);
        }
        self.updated_at = now;
    }
}

/// Event unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an event ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, EventIdError> {
        Uuid::parse_str(s)
            .map(EventId)
            .map_err(|e| EventIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Event title value type, 1-200 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTitle(String);

impl EventTitle {
    const MAX_LENGTH: usize = 200;

    pub fn new(title: String) -> Result<Self, EventTitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();
        if length == 0 {
            Err(EventTitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(EventTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescription(String);

impl EventDescription {
    const MAX_LENGTH: usize = 5000;

    pub fn new(description: String) -> Result<Self, DescriptionError> {
        let length = description.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(DescriptionError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(description))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Venue of an event, 1-300 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(String);

impl Location {
    const MAX_LENGTH: usize = 300;

    pub fn new(location: String) -> Result<Self, LocationError> {
        let location = location.trim().to_string();
        let length = location.chars().count();
        if length == 0 {
            Err(LocationError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(LocationError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(location))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Maximum number of invited guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GuestCapacity(u32);

impl GuestCapacity {
    const MIN: u32 = 1;
    const MAX: u32 = 10_000;

    pub fn new(capacity: i64) -> Result<Self, CapacityError> {
        match u32::try_from(capacity) {
            Ok(value) if (Self::MIN..=Self::MAX).contains(&value) => Ok(Self(value)),
            _ => Err(CapacityError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: capacity,
            }),
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Command to create an event with domain types
#[derive(Debug, Clone)]
pub struct CreateEventCommand {
    pub title: EventTitle,
    pub description: Option<EventDescription>,
    pub starts_at: DateTime<Utc>,
    pub location: Location,
    pub max_guests: Option<GuestCapacity>,
    pub rsvp_deadline: Option<DateTime<Utc>>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateEventCommand {
    pub title: Option<EventTitle>,
    pub description: Option<EventDescription>,
    pub starts_at: Option<DateTime<Utc>>,
    pub location: Option<Location>,
    pub max_guests: Option<GuestCapacity>,
    pub rsvp_deadline: Option<DateTime<Utc>>,
}
