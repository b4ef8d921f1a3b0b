use chrono::DateTime;
use chrono::Utc;

use crate::domain::event::models::Event;
use crate::domain::event::models::EventId;
use crate::domain::guest::models::AttendanceStatus;
use crate::domain::guest::models::Guest;

/// Guest counters derived from current statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub guest_count: u64,
    pub confirmed_count: u64,
    pub declined_count: u64,
    pub pending_count: u64,
    pub expected_attendees: u64,
}

impl StatusCounts {
    pub fn tally<'a>(guests: impl IntoIterator<Item = &'a Guest>) -> Self {
        guests.into_iter().fold(Self::default(), |counts, guest| counts.add(guest))
    }

    fn add(mut self, guest: &Guest) -> Self {
        self.guest_count += 1;
        match guest.status {
            AttendanceStatus::Pending => self.pending_count += 1,
            AttendanceStatus::Confirmed => self.confirmed_count += 1,
            AttendanceStatus::Declined => self.declined_count += 1,
        }
        self.expected_attendees += u64::from(guest.expected_attendees());
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            guest_count: self.guest_count + other.guest_count,
            confirmed_count: self.confirmed_count + other.confirmed_count,
            declined_count: self.declined_count + other.declined_count,
            pending_count: self.pending_count + other.pending_count,
            expected_attendees: self.expected_attendees + other.expected_attendees,
        }
    }
}

/// Counters of a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub event_id: EventId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub counts: StatusCounts,
}

/// Owner-wide aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub event_count: u64,
    pub totals: StatusCounts,
    pub events: Vec<EventSummary>,
}

impl DashboardSummary {
    /// Fold events and the guests belonging to them into a summary.
    ///
    /// Guests whose event is not in `events` are ignored.
    pub fn build(events: &[Event], guests: &[Guest]) -> Self {
        let summaries: Vec<EventSummary> = events
            .iter()
            .map(|event| EventSummary {
                event_id: event.id,
                title: event.title.as_str().to_string(),
                starts_at: event.starts_at,
                counts: StatusCounts::tally(guests.iter().filter(|g| g.event_id == event.id)),
            })
            .collect();

        Self {
            event_count: summaries.len() as u64,
            totals: summaries
                .iter()
                .fold(StatusCounts::default(), |acc, s| acc.merge(s.counts)),
            events: summaries,
        }
    }
}
