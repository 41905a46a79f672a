//! SQLite-backed store.
//!
//! Uniqueness of `users.email` and `attendees(event_id, rider_id)` is enforced
//! by the schema, so concurrent registrations for the same pair cannot both
//! commit. Attendance rows cascade with their event or rider.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use paddock_auth::{NewUser, User};
use paddock_core::{AttendeeId, EventId, RiderId, UserId};
use paddock_racing::{Attendee, Event, EventDetails, Rider, RiderDetails, RiderSummary};

use super::deadline::with_deadline;
use super::r#trait::{
    AttendeeRepository, DUPLICATE_ATTENDEE, DUPLICATE_EMAIL, EventRepository, RiderRepository,
    StoreError, StoreResult, UserRepository,
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        email     TEXT NOT NULL UNIQUE,
        password  TEXT NOT NULL,
        name      TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name        TEXT NOT NULL,
        description TEXT NOT NULL,
        date        TEXT NOT NULL,
        location    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS riders (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        first_name    TEXT NOT NULL,
        last_name     TEXT NOT NULL,
        number        INTEGER NOT NULL,
        team          TEXT NOT NULL DEFAULT '',
        bike_brand    TEXT NOT NULL DEFAULT '',
        class         TEXT NOT NULL DEFAULT '',
        nationality   TEXT NOT NULL DEFAULT '',
        date_of_birth TEXT NOT NULL DEFAULT '',
        career_points INTEGER NOT NULL DEFAULT 0,
        status        TEXT NOT NULL DEFAULT 'active'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendees (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        rider_id INTEGER NOT NULL REFERENCES riders(id) ON DELETE CASCADE,
        UNIQUE (event_id, rider_id)
    )
    "#,
];

const EVENT_COLUMNS: &str = "e.id, e.owner_id, e.name, e.description, e.date, e.location";
const RIDER_COLUMNS: &str = "id, owner_id, first_name, last_name, number, team, bike_brand, \
     class, nationality, date_of_birth, career_points, status";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteStore {
    /// Connect (creating the database file if needed) and apply the schema.
    ///
    /// `timeout` bounds every subsequent operation, connection checkout included.
    pub async fn connect(url: &str, timeout: Duration) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(backend)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(timeout)
            .connect_with(options)
            .await
            .map_err(backend)?;

        Self::with_pool(pool, timeout).await
    }

    /// Private in-memory database (tests/dev). One connection, kept alive.
    pub async fn in_memory(timeout: Duration) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(backend)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(timeout)
            .connect_with(options)
            .await
            .map_err(backend)?;

        Self::with_pool(pool, timeout).await
    }

    async fn with_pool(pool: SqlitePool, timeout: Duration) -> StoreResult<Self> {
        let store = Self { pool, timeout };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> StoreResult<()> {
        with_deadline(self.timeout, "migrate", async {
            for statement in SCHEMA {
                sqlx::query(statement)
                    .execute(&self.pool)
                    .await
                    .map_err(backend)?;
            }
            tracing::debug!("sqlite schema ready");
            Ok(())
        })
        .await
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Map constraint violations on insert to their domain meaning.
fn insert_error(err: sqlx::Error, duplicate: &str, missing: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(duplicate.to_string()),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::MissingReference(missing.to_string())
        }
        _ => backend(err),
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: UserId::new(row.try_get("id")?),
        email: row.try_get("email")?,
        password_digest: row.try_get("password")?,
        display_name: row.try_get("name")?,
    })
}

fn event_from_row(row: &SqliteRow) -> Result<Event, sqlx::Error> {
    Ok(Event {
        id: EventId::new(row.try_get("id")?),
        owner_id: UserId::new(row.try_get("owner_id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        date: row.try_get::<NaiveDate, _>("date")?,
        location: row.try_get("location")?,
    })
}

fn rider_from_row(row: &SqliteRow) -> Result<Rider, sqlx::Error> {
    Ok(Rider {
        id: RiderId::new(row.try_get("id")?),
        owner_id: UserId::new(row.try_get("owner_id")?),
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        number: row.try_get("number")?,
        team: row.try_get("team")?,
        bike_brand: row.try_get("bike_brand")?,
        class: row.try_get("class")?,
        nationality: row.try_get("nationality")?,
        date_of_birth: row.try_get("date_of_birth")?,
        career_points: row.try_get("career_points")?,
        status: row.try_get("status")?,
    })
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        with_deadline(self.timeout, "insert_user", async {
            let id = sqlx::query("INSERT INTO users (email, password, name) VALUES (?, ?, ?)")
                .bind(&user.email)
                .bind(&user.password_digest)
                .bind(&user.display_name)
                .execute(&self.pool)
                .await
                .map_err(|e| insert_error(e, DUPLICATE_EMAIL, "user"))?
                .last_insert_rowid();

            Ok(User {
                id: UserId::new(id),
                email: user.email,
                password_digest: user.password_digest,
                display_name: user.display_name,
            })
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        with_deadline(self.timeout, "find_user", async {
            let row = sqlx::query("SELECT id, email, password, name FROM users WHERE id = ?")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
            row.as_ref().map(user_from_row).transpose().map_err(backend)
        })
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        with_deadline(self.timeout, "find_user_by_email", async {
            let row = sqlx::query("SELECT id, email, password, name FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
            row.as_ref().map(user_from_row).transpose().map_err(backend)
        })
        .await
    }
}

#[async_trait]
impl EventRepository for SqliteStore {
    async fn insert_event(&self, owner: UserId, details: EventDetails) -> StoreResult<Event> {
        with_deadline(self.timeout, "insert_event", async {
            let id = sqlx::query(
                "INSERT INTO events (owner_id, name, description, date, location) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(owner.get())
            .bind(&details.name)
            .bind(&details.description)
            .bind(details.date)
            .bind(&details.location)
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error(e, "event already exists", "user"))?
            .last_insert_rowid();

            Ok(Event::from_details(EventId::new(id), owner, details))
        })
        .await
    }

    async fn find_event(&self, id: EventId) -> StoreResult<Option<Event>> {
        with_deadline(self.timeout, "find_event", async {
            let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = ?"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
            row.as_ref().map(event_from_row).transpose().map_err(backend)
        })
        .await
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        with_deadline(self.timeout, "list_events", async {
            let rows = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events e ORDER BY e.id"))
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
            rows.iter().map(event_from_row).collect::<Result<Vec<_>, _>>().map_err(backend)
        })
        .await
    }

    async fn update_event(&self, id: EventId, details: EventDetails) -> StoreResult<Option<Event>> {
        with_deadline(self.timeout, "update_event", async {
            let row = sqlx::query(
                "UPDATE events SET name = ?, description = ?, date = ?, location = ? WHERE id = ? \
                 RETURNING owner_id",
            )
            .bind(&details.name)
            .bind(&details.description)
            .bind(details.date)
            .bind(&details.location)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

            match row {
                Some(row) => {
                    let owner = UserId::new(row.try_get("owner_id").map_err(backend)?);
                    Ok(Some(Event::from_details(id, owner, details)))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn delete_event(&self, id: EventId) -> StoreResult<bool> {
        with_deadline(self.timeout, "delete_event", async {
            let result = sqlx::query("DELETE FROM events WHERE id = ?")
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(backend)?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}

#[async_trait]
impl RiderRepository for SqliteStore {
    async fn insert_rider(&self, owner: UserId, details: RiderDetails) -> StoreResult<Rider> {
        with_deadline(self.timeout, "insert_rider", async {
            let id = sqlx::query(
                "INSERT INTO riders (owner_id, first_name, last_name, number, team, bike_brand, class, \
                 nationality, date_of_birth, career_points, status) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(owner.get())
            .bind(&details.first_name)
            .bind(&details.last_name)
            .bind(details.number)
            .bind(&details.team)
            .bind(&details.bike_brand)
            .bind(&details.class)
            .bind(&details.nationality)
            .bind(&details.date_of_birth)
            .bind(details.career_points)
            .bind(&details.status)
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error(e, "rider already exists", "user"))?
            .last_insert_rowid();

            Ok(Rider::from_details(RiderId::new(id), owner, details))
        })
        .await
    }

    async fn find_rider(&self, id: RiderId) -> StoreResult<Option<Rider>> {
        with_deadline(self.timeout, "find_rider", async {
            let row = sqlx::query(&format!("SELECT {RIDER_COLUMNS} FROM riders WHERE id = ?"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
            row.as_ref().map(rider_from_row).transpose().map_err(backend)
        })
        .await
    }

    async fn list_riders(&self) -> StoreResult<Vec<Rider>> {
        with_deadline(self.timeout, "list_riders", async {
            let rows = sqlx::query(&format!("SELECT {RIDER_COLUMNS} FROM riders ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(backend)?;
            rows.iter().map(rider_from_row).collect::<Result<Vec<_>, _>>().map_err(backend)
        })
        .await
    }

    async fn update_rider(&self, id: RiderId, details: RiderDetails) -> StoreResult<Option<Rider>> {
        with_deadline(self.timeout, "update_rider", async {
            let row = sqlx::query(
                "UPDATE riders SET first_name = ?, last_name = ?, number = ?, team = ?, bike_brand = ?, \
                 class = ?, nationality = ?, date_of_birth = ?, career_points = ?, status = ? \
                 WHERE id = ? RETURNING owner_id",
            )
            .bind(&details.first_name)
            .bind(&details.last_name)
            .bind(details.number)
            .bind(&details.team)
            .bind(&details.bike_brand)
            .bind(&details.class)
            .bind(&details.nationality)
            .bind(&details.date_of_birth)
            .bind(details.career_points)
            .bind(&details.status)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

            match row {
                Some(row) => {
                    let owner = UserId::new(row.try_get("owner_id").map_err(backend)?);
                    Ok(Some(Rider::from_details(id, owner, details)))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn delete_rider(&self, id: RiderId) -> StoreResult<bool> {
        with_deadline(self.timeout, "delete_rider", async {
            let result = sqlx::query("DELETE FROM riders WHERE id = ?")
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(backend)?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}

#[async_trait]
impl AttendeeRepository for SqliteStore {
    async fn insert_attendee(&self, event_id: EventId, rider_id: RiderId) -> StoreResult<Attendee> {
        with_deadline(self.timeout, "insert_attendee", async {
            let id = sqlx::query("INSERT INTO attendees (event_id, rider_id) VALUES (?, ?)")
                .bind(event_id.get())
                .bind(rider_id.get())
                .execute(&self.pool)
                .await
                .map_err(|e| insert_error(e, DUPLICATE_ATTENDEE, "event or rider"))?
                .last_insert_rowid();

            Ok(Attendee {
                id: AttendeeId::new(id),
                event_id,
                rider_id,
            })
        })
        .await
    }

    async fn delete_attendee(&self, event_id: EventId, rider_id: RiderId) -> StoreResult<bool> {
        with_deadline(self.timeout, "delete_attendee", async {
            let result = sqlx::query("DELETE FROM attendees WHERE event_id = ? AND rider_id = ?")
                .bind(event_id.get())
                .bind(rider_id.get())
                .execute(&self.pool)
                .await
                .map_err(backend)?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn riders_for_event(&self, event_id: EventId) -> StoreResult<Vec<RiderSummary>> {
        with_deadline(self.timeout, "riders_for_event", async {
            let rows = sqlx::query(
                r#"
                SELECT r.id, r.first_name, r.last_name
                FROM riders r
                JOIN attendees a ON r.id = a.rider_id
                WHERE a.event_id = ?
                ORDER BY a.id
                "#,
            )
            .bind(event_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

            rows.iter()
                .map(|row| -> Result<RiderSummary, sqlx::Error> {
                    Ok(RiderSummary {
                        id: RiderId::new(row.try_get("id")?),
                        first_name: row.try_get("first_name")?,
                        last_name: row.try_get("last_name")?,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(backend)
        })
        .await
    }

    async fn events_for_rider(&self, rider_id: RiderId) -> StoreResult<Vec<Event>> {
        with_deadline(self.timeout, "events_for_rider", async {
            let rows = sqlx::query(&format!(
                "SELECT {EVENT_COLUMNS} FROM events e \
                 JOIN attendees a ON e.id = a.event_id \
                 WHERE a.rider_id = ? ORDER BY a.id"
            ))
            .bind(rider_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
            rows.iter().map(event_from_row).collect::<Result<Vec<_>, _>>().map_err(backend)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        SqliteStore::in_memory(Duration::from_secs(3)).await.unwrap()
    }

    async fn alice(store: &SqliteStore) -> User {
        store
            .insert_user(NewUser {
                email: "alice@example.com".to_string(),
                password_digest: "$argon2id$digest".to_string(),
                display_name: "Alice".to_string(),
            })
            .await
            .unwrap()
    }

    fn event_details() -> EventDetails {
        EventDetails::parse("Washougal", "Pacific northwest round", "2025-07-26", "Washougal, WA").unwrap()
    }

    fn rider_details() -> RiderDetails {
        RiderDetails {
            first_name: "Eli".to_string(),
            last_name: "Tomac".to_string(),
            number: 3,
            team: "Yamaha".to_string(),
            career_points: 120,
            ..Default::default()
        }
        .validated()
        .unwrap()
    }

    #[tokio::test]
    async fn users_round_trip_and_email_is_unique() {
        let store = store().await;
        let user = alice(&store).await;

        assert_eq!(store.find_user(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(store.find_user_by_email("alice@example.com").await.unwrap(), Some(user));

        let err = store
            .insert_user(NewUser {
                email: "alice@example.com".to_string(),
                password_digest: "x".to_string(),
                display_name: "Imposter".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Duplicate(DUPLICATE_EMAIL.to_string()));
    }

    #[tokio::test]
    async fn event_crud() {
        let store = store().await;
        let owner = alice(&store).await;

        let event = store.insert_event(owner.id, event_details()).await.unwrap();
        assert_eq!(store.find_event(event.id).await.unwrap(), Some(event.clone()));
        assert_eq!(store.list_events().await.unwrap(), vec![event.clone()]);

        let changed = EventDetails::parse("Unadilla", "Classic east coast round", "2025-08-16", "New Berlin")
            .unwrap();
        let updated = store.update_event(event.id, changed).await.unwrap().unwrap();
        assert_eq!(updated.owner_id, owner.id);
        assert_eq!(store.find_event(event.id).await.unwrap(), Some(updated));

        assert!(store.delete_event(event.id).await.unwrap());
        assert_eq!(store.find_event(event.id).await.unwrap(), None);
        assert!(!store.delete_event(event.id).await.unwrap());
    }

    #[tokio::test]
    async fn rider_round_trip_keeps_all_fields() {
        let store = store().await;
        let owner = alice(&store).await;
        let rider = store.insert_rider(owner.id, rider_details()).await.unwrap();

        let loaded = store.find_rider(rider.id).await.unwrap().unwrap();
        assert_eq!(loaded, rider);
        assert_eq!(loaded.status, "active");
        assert_eq!(loaded.career_points, 120);
    }

    #[tokio::test]
    async fn attendee_constraints_are_enforced_by_schema() {
        let store = store().await;
        let owner = alice(&store).await;
        let event = store.insert_event(owner.id, event_details()).await.unwrap();
        let rider = store.insert_rider(owner.id, rider_details()).await.unwrap();

        store.insert_attendee(event.id, rider.id).await.unwrap();
        let err = store.insert_attendee(event.id, rider.id).await.unwrap_err();
        assert_eq!(err, StoreError::Duplicate(DUPLICATE_ATTENDEE.to_string()));

        let err = store.insert_attendee(EventId::new(999), rider.id).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));

        let riders = store.riders_for_event(event.id).await.unwrap();
        assert_eq!(riders, vec![rider.summary()]);
        assert_eq!(store.events_for_rider(rider.id).await.unwrap(), vec![event.clone()]);
    }

    #[tokio::test]
    async fn delete_attendee_is_set_removal() {
        let store = store().await;
        let owner = alice(&store).await;
        let event = store.insert_event(owner.id, event_details()).await.unwrap();
        let rider = store.insert_rider(owner.id, rider_details()).await.unwrap();

        assert!(!store.delete_attendee(event.id, rider.id).await.unwrap());
        store.insert_attendee(event.id, rider.id).await.unwrap();
        assert!(store.delete_attendee(event.id, rider.id).await.unwrap());
        assert!(store.riders_for_event(event.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_rider_cascades() {
        let store = store().await;
        let owner = alice(&store).await;
        let event = store.insert_event(owner.id, event_details()).await.unwrap();
        let rider = store.insert_rider(owner.id, rider_details()).await.unwrap();
        store.insert_attendee(event.id, rider.id).await.unwrap();

        assert!(store.delete_rider(rider.id).await.unwrap());
        assert!(store.riders_for_event(event.id).await.unwrap().is_empty());
    }
}
