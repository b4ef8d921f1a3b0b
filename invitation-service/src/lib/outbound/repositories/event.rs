use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::retry::StorageError;
use super::retry::StoragePolicy;
use crate::domain::event::errors::EventError;
use crate::domain::event::models::Event;
use crate::domain::event::models::EventDescription;
use crate::domain::event::models::EventId;
use crate::domain::event::models::EventTitle;
use crate::domain::event::models::GuestCapacity;
use crate::domain::event::models::Location;
use crate::domain::event::ports::EventRepository;
use crate::domain::user::models::UserId;

const EVENT_COLUMNS: &str = "id, owner_id, title, description, starts_at, location, \
     max_guests, rsvp_deadline, created_at, updated_at";

pub struct PostgresEventRepository {
    pool: PgPool,
    policy: StoragePolicy,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool, policy: StoragePolicy) -> Self {
        Self { pool, policy }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    starts_at: DateTime<Utc>,
    location: String,
    max_guests: Option<i32>,
    rsvp_deadline: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = EventError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: EventId(row.id),
            owner_id: UserId(row.owner_id),
            title: EventTitle::new(row.title)?,
            description: row.description.map(EventDescription::new).transpose()?,
            starts_at: row.starts_at,
            location: Location::new(row.location)?,
            max_guests: row
                .max_guests
                .map(|m| GuestCapacity::new(i64::from(m)))
                .transpose()?,
            rsvp_deadline: row.rsvp_deadline,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn storage_failure(err: StorageError) -> EventError {
    match err {
        StorageError::Infrastructure(e) => EventError::Infrastructure(e),
        StorageError::UniqueViolation { constraint } => {
            EventError::Unknown(format!("unexpected unique violation on {}", constraint))
        }
    }
}

fn capacity_column(event: &Event) -> Option<i32> {
    event
        .max_guests
        .and_then(|capacity| i32::try_from(capacity.get()).ok())
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn create(&self, event: Event) -> Result<Event, EventError> {
        let pool = &self.pool;
        let row = &event;

        self.policy
            .run("insert_event", move || async move {
                sqlx::query(
                    r#"
                    INSERT INTO events (id, owner_id, title, description, starts_at, location,
                                        max_guests, rsvp_deadline, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    ON CONFLICT (id) DO NOTHING
                    "#,
                )
                .bind(row.id.0)
                .bind(row.owner_id.0)
                .bind(row.title.as_str())
                .bind(row.description.as_ref().map(|d| d.as_str()))
                .bind(row.starts_at)
                .bind(row.location.as_str())
                .bind(capacity_column(row))
                .bind(row.rsvp_deadline)
                .bind(row.created_at)
                .bind(row.updated_at)
                .execute(pool)
                .await
            })
            .await
            .map_err(storage_failure)?;

        Ok(event)
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventError> {
        let pool = &self.pool;
        let id = id.0;
        let query = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let query = query.as_str();

        let row = self
            .policy
            .run("find_event_by_id", move || async move {
                sqlx::query_as::<_, EventRow>(query)
                    .bind(id)
                    .fetch_optional(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        row.map(Event::try_from).transpose()
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Event>, EventError> {
        let pool = &self.pool;
        let owner_id = owner.0;
        let query = format!(
            "SELECT {} FROM events WHERE owner_id = $1 ORDER BY starts_at ASC, created_at ASC",
            EVENT_COLUMNS
        );
        let query = query.as_str();

        let rows = self
            .policy
            .run("find_events_by_owner", move || async move {
                sqlx::query_as::<_, EventRow>(query)
                    .bind(owner_id)
                    .fetch_all(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn update(&self, event: Event) -> Result<Event, EventError> {
        let pool = &self.pool;
        let row = &event;

        let result = self
            .policy
            .run("update_event", move || async move {
                sqlx::query(
                    r#"
                    UPDATE events
                    SET title = $2, description = $3, starts_at = $4, location = $5,
                        max_guests = $6, rsvp_deadline = $7, updated_at = $8
                    WHERE id = $1
                    "#,
                )
                .bind(row.id.0)
                .bind(row.title.as_str())
                .bind(row.description.as_ref().map(|d| d.as_str()))
                .bind(row.starts_at)
                .bind(row.location.as_str())
                .bind(capacity_column(row))
                .bind(row.rsvp_deadline)
                .bind(row.updated_at)
                .execute(pool)
                .await
            })
            .await
            .map_err(storage_failure)?;

        if result.rows_affected() == 0 {
            return Err(EventError::NotFound(event.id.to_string()));
        }

        Ok(event)
    }

    async fn delete(&self, id: &EventId) -> Result<(), EventError> {
        let pool = &self.pool;
        let event_id = id.0;

        // Guests go with the event through ON DELETE CASCADE.
        let result = self
            .policy
            .run("delete_event", move || async move {
                sqlx::query("DELETE FROM events WHERE id = $1")
                    .bind(event_id)
                    .execute(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        if result.rows_affected() == 0 {
            return Err(EventError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
