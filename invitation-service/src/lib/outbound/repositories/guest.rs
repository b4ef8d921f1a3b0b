use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::retry::StorageError;
use super::retry::StoragePolicy;
use crate::domain::event::models::EventId;
use crate::domain::guest::errors::GuestError;
use crate::domain::guest::models::AttendanceStatus;
use crate::domain::guest::models::ContactInfo;
use crate::domain::guest::models::Guest;
use crate::domain::guest::models::GuestId;
use crate::domain::guest::models::GuestName;
use crate::domain::guest::models::InvitationToken;
use crate::domain::guest::models::PhoneNumber;
use crate::domain::guest::models::ResponseDetails;
use crate::domain::guest::ports::GuestRepository;
use crate::domain::user::models::EmailAddress;

const GUEST_COLUMNS: &str = "id, event_id, name, email, phone, token, status, responded_at, \
     additional_guests, notes, created_at";

pub struct PostgresGuestRepository {
    pool: PgPool,
    policy: StoragePolicy,
}

impl PostgresGuestRepository {
    pub fn new(pool: PgPool, policy: StoragePolicy) -> Self {
        Self { pool, policy }
    }

    async fn exists(&self, id: &GuestId) -> Result<bool, GuestError> {
        let pool = &self.pool;
        let id = id.0;

        self.policy
            .run("guest_exists", move || async move {
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM guests WHERE id = $1)")
                    .bind(id)
                    .fetch_one(pool)
                    .await
            })
            .await
            .map_err(storage_failure)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GuestRow {
    id: Uuid,
    event_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    token: String,
    status: String,
    responded_at: Option<DateTime<Utc>>,
    additional_guests: i32,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<GuestRow> for Guest {
    type Error = GuestError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        let additional_guests = u32::try_from(row.additional_guests)
            .map_err(|e| GuestError::Unknown(format!("negative additional_guests: {}", e)))?;

        Ok(Guest {
            id: GuestId(row.id),
            event_id: EventId(row.event_id),
            name: GuestName::new(row.name)?,
            contact: ContactInfo {
                email: row.email.map(EmailAddress::new).transpose()?,
                phone: row.phone.map(PhoneNumber::new).transpose()?,
            },
            token: InvitationToken::new(row.token),
            status: row.status.parse()?,
            responded_at: row.responded_at,
            details: ResponseDetails::new(additional_guests, row.notes)?,
            created_at: row.created_at,
        })
    }
}

fn storage_failure(err: StorageError) -> GuestError {
    match err {
        StorageError::Infrastructure(e) => GuestError::Infrastructure(e),
        StorageError::UniqueViolation { constraint } => {
            GuestError::Unknown(format!("unexpected unique violation on {}", constraint))
        }
    }
}

fn additional_guests_column(details: &ResponseDetails) -> i32 {
    i32::try_from(details.additional_guests).unwrap_or(i32::MAX)
}

#[async_trait]
impl GuestRepository for PostgresGuestRepository {
    async fn insert(&self, guest: Guest) -> Result<Guest, GuestError> {
        let pool = &self.pool;
        let row = &guest;

        self.policy
            .run("insert_guest", move || async move {
                sqlx::query(
                    r#"
                    INSERT INTO guests (id, event_id, name, email, phone, token, status,
                                        responded_at, additional_guests, notes, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    ON CONFLICT (id) DO NOTHING
                    "#,
                )
                .bind(row.id.0)
                .bind(row.event_id.0)
                .bind(row.name.as_str())
                .bind(row.contact.email.as_ref().map(|e| e.as_str()))
                .bind(row.contact.phone.as_ref().map(|p| p.as_str()))
                .bind(row.token.as_str())
                .bind(row.status.as_str())
                .bind(row.responded_at)
                .bind(additional_guests_column(&row.details))
                .bind(row.details.notes.as_deref())
                .bind(row.created_at)
                .execute(pool)
                .await
            })
            .await
            .map_err(|e| match e {
                StorageError::UniqueViolation { ref constraint }
                    if constraint == "guests_token_key" =>
                {
                    GuestError::TokenCollision
                }
                other => storage_failure(other),
            })?;

        Ok(guest)
    }

    async fn find_by_id(&self, id: &GuestId) -> Result<Option<Guest>, GuestError> {
        let pool = &self.pool;
        let id = id.0;
        let query = format!("SELECT {} FROM guests WHERE id = $1", GUEST_COLUMNS);
        let query = query.as_str();

        let row = self
            .policy
            .run("find_guest_by_id", move || async move {
                sqlx::query_as::<_, GuestRow>(query)
                    .bind(id)
                    .fetch_optional(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        row.map(Guest::try_from).transpose()
    }

    async fn find_by_token(&self, token: &InvitationToken) -> Result<Option<Guest>, GuestError> {
        let pool = &self.pool;
        let token = token.as_str();
        let query = format!("SELECT {} FROM guests WHERE token = $1", GUEST_COLUMNS);
        let query = query.as_str();

        let row = self
            .policy
            .run("find_guest_by_token", move || async move {
                sqlx::query_as::<_, GuestRow>(query)
                    .bind(token)
                    .fetch_optional(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        row.map(Guest::try_from).transpose()
    }

    async fn token_exists(&self, token: &InvitationToken) -> Result<bool, GuestError> {
        let pool = &self.pool;
        let token = token.as_str();

        self.policy
            .run("invitation_token_exists", move || async move {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM guests WHERE token = $1)",
                )
                .bind(token)
                .fetch_one(pool)
                .await
            })
            .await
            .map_err(storage_failure)
    }

    async fn find_by_event(&self, event_id: &EventId) -> Result<Vec<Guest>, GuestError> {
        let pool = &self.pool;
        let event_id = event_id.0;
        let query = format!(
            "SELECT {} FROM guests WHERE event_id = $1 ORDER BY created_at ASC",
            GUEST_COLUMNS
        );
        let query = query.as_str();

        let rows = self
            .policy
            .run("find_guests_by_event", move || async move {
                sqlx::query_as::<_, GuestRow>(query)
                    .bind(event_id)
                    .fetch_all(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        rows.into_iter().map(Guest::try_from).collect()
    }

    async fn find_by_events(&self, event_ids: &[EventId]) -> Result<Vec<Guest>, GuestError> {
        let pool = &self.pool;
        let uuids: Vec<Uuid> = event_ids.iter().map(|id| id.0).collect();
        let uuids = uuids.as_slice();
        let query = format!(
            "SELECT {} FROM guests WHERE event_id = ANY($1) ORDER BY created_at ASC",
            GUEST_COLUMNS
        );
        let query = query.as_str();

        let rows = self
            .policy
            .run("find_guests_by_events", move || async move {
                sqlx::query_as::<_, GuestRow>(query)
                    .bind(uuids)
                    .fetch_all(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        rows.into_iter().map(Guest::try_from).collect()
    }

    async fn count_by_event(&self, event_id: &EventId) -> Result<u64, GuestError> {
        let pool = &self.pool;
        let event_id = event_id.0;

        let count = self
            .policy
            .run("count_guests_by_event", move || async move {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM guests WHERE event_id = $1")
                    .bind(event_id)
                    .fetch_one(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn update_profile(
        &self,
        id: &GuestId,
        name: &GuestName,
        contact: &ContactInfo,
    ) -> Result<Guest, GuestError> {
        let pool = &self.pool;
        let guest_id = id.0;
        let query = format!(
            "UPDATE guests SET name = $2, email = $3, phone = $4 WHERE id = $1 RETURNING {}",
            GUEST_COLUMNS
        );
        let query = query.as_str();

        let row = self
            .policy
            .run("update_guest_profile", move || async move {
                sqlx::query_as::<_, GuestRow>(query)
                    .bind(guest_id)
                    .bind(name.as_str())
                    .bind(contact.email.as_ref().map(|e| e.as_str()))
                    .bind(contact.phone.as_ref().map(|p| p.as_str()))
                    .fetch_optional(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        row.map(Guest::try_from)
            .transpose()?
            .ok_or_else(|| GuestError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &GuestId) -> Result<(), GuestError> {
        let pool = &self.pool;
        let guest_id = id.0;

        let result = self
            .policy
            .run("delete_guest", move || async move {
                sqlx::query("DELETE FROM guests WHERE id = $1")
                    .bind(guest_id)
                    .execute(pool)
                    .await
            })
            .await
            .map_err(storage_failure)?;

        if result.rows_affected() == 0 {
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
        let pool = &self.pool;
        let guest_id = id.0;

        // Compare-and-swap on the status column.
        let result = self
            .policy
            .run("record_guest_response", move || async move {
                sqlx::query(
                    r#"
                    UPDATE guests
                    SET status = $3, responded_at = $4, additional_guests = $5, notes = $6
                    WHERE id = $1 AND status = $2
                    "#,
                )
                .bind(guest_id)
                .bind(expected.as_str())
                .bind(new.as_str())
                .bind(responded_at)
                .bind(additional_guests_column(details))
                .bind(details.notes.as_deref())
                .execute(pool)
                .await
            })
            .await
            .map_err(storage_failure)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        if self.exists(id).await? {
            Ok(false)
        } else {
            Err(GuestError::NotFound(id.to_string()))
        }
    }
}
