use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use paddock_auth::{NewUser, User};
use paddock_core::{DomainError, EventId, RiderId, UserId};
use paddock_racing::{Attendee, Event, EventDetails, Rider, RiderDetails, RiderSummary};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A foreign key pointed at a row that does not exist (anymore).
    #[error("{0} not found")]
    MissingReference(String),

    #[error("storage operation `{op}` timed out after {limit:?}")]
    Timeout { op: &'static str, limit: Duration },

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate(msg) => DomainError::conflict(msg),
            StoreError::MissingReference(what) => DomainError::not_found(what),
            other => DomainError::storage(other.to_string()),
        }
    }
}

/// Credential Store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] if the email is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// `email` must already be normalized (trimmed, lowercase).
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert_event(&self, owner: UserId, details: EventDetails) -> StoreResult<Event>;

    async fn find_event(&self, id: EventId) -> StoreResult<Option<Event>>;

    async fn list_events(&self) -> StoreResult<Vec<Event>>;

    /// Replace the mutable fields. `None` if the event vanished in between.
    async fn update_event(&self, id: EventId, details: EventDetails) -> StoreResult<Option<Event>>;

    /// Deletes the event and its attendance rows. Returns whether a row was removed.
    async fn delete_event(&self, id: EventId) -> StoreResult<bool>;
}

#[async_trait]
pub trait RiderRepository: Send + Sync {
    async fn insert_rider(&self, owner: UserId, details: RiderDetails) -> StoreResult<Rider>;

    async fn find_rider(&self, id: RiderId) -> StoreResult<Option<Rider>>;

    async fn list_riders(&self) -> StoreResult<Vec<Rider>>;

    async fn update_rider(&self, id: RiderId, details: RiderDetails) -> StoreResult<Option<Rider>>;

    /// Deletes the rider and its attendance rows. Returns whether a row was removed.
    async fn delete_rider(&self, id: RiderId) -> StoreResult<bool>;
}

/// Attendance rows. `(event_id, rider_id)` is unique at the storage level.
#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// Atomic check-and-insert.
    ///
    /// Fails with [`StoreError::Duplicate`] if the pair already exists and with
    /// [`StoreError::MissingReference`] if either side does not exist.
    async fn insert_attendee(&self, event_id: EventId, rider_id: RiderId) -> StoreResult<Attendee>;

    /// Returns whether a row was removed.
    async fn delete_attendee(&self, event_id: EventId, rider_id: RiderId) -> StoreResult<bool>;

    async fn riders_for_event(&self, event_id: EventId) -> StoreResult<Vec<RiderSummary>>;

    async fn events_for_rider(&self, rider_id: RiderId) -> StoreResult<Vec<Event>>;
}

/// Everything the application needs from a backing store.
pub trait Store: UserRepository + EventRepository + RiderRepository + AttendeeRepository {}

impl<T> Store for T where T: UserRepository + EventRepository + RiderRepository + AttendeeRepository {}

pub(crate) const DUPLICATE_EMAIL: &str = "email is already registered";
pub(crate) const DUPLICATE_ATTENDEE: &str = "rider is already registered for this event";
