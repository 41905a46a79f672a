use std::sync::Arc;

use paddock_auth::ensure_owner;
use paddock_core::{DomainError, DomainResult, EventId, RiderId, UserId};
use paddock_infra::Store;
use paddock_racing::{Attendee, Event, RiderSummary};

/// Relationship manager for event attendance.
///
/// Per `(event, rider)` pair the only states are absent and registered.
/// Only the event's owner may change them; listings are public.
#[derive(Clone)]
pub struct AttendanceManager {
    store: Arc<dyn Store>,
}

impl AttendanceManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Register `rider_id` for `event_id` on behalf of `actor`.
    ///
    /// Errors, in the order they are checked:
    /// - event missing: `NotFound`
    /// - rider missing: `NotFound`
    /// - actor does not own the event: `Forbidden`
    /// - pair already registered: `Conflict`
    pub async fn register(&self, actor: UserId, event_id: EventId, rider_id: RiderId) -> DomainResult<Attendee> {
        let event = self.require_event(event_id).await?;
        if self.store.find_rider(rider_id).await?.is_none() {
            return Err(DomainError::not_found("rider"));
        }
        ensure_owner(Some(event), actor)?;

        let attendee = self.store.insert_attendee(event_id, rider_id).await?;
        tracing::info!(
            user_id = %actor,
            event_id = %event_id,
            rider_id = %rider_id,
            attendee_id = %attendee.id,
            "rider registered for event"
        );
        Ok(attendee)
    }

    /// Remove `rider_id` from `event_id`.
    ///
    /// Succeeds whether or not the pair was registered. The rider itself is
    /// not looked up.
    pub async fn unregister(&self, actor: UserId, event_id: EventId, rider_id: RiderId) -> DomainResult<()> {
        let event = self.store.find_event(event_id).await?;
        ensure_owner(event, actor)?;

        let removed = self.store.delete_attendee(event_id, rider_id).await?;
        tracing::info!(
            user_id = %actor,
            event_id = %event_id,
            rider_id = %rider_id,
            removed,
            "rider unregistered from event"
        );
        Ok(())
    }

    pub async fn list_riders_for_event(&self, event_id: EventId) -> DomainResult<Vec<RiderSummary>> {
        self.require_event(event_id).await?;
        Ok(self.store.riders_for_event(event_id).await?)
    }

    pub async fn list_events_for_rider(&self, rider_id: RiderId) -> DomainResult<Vec<Event>> {
        if self.store.find_rider(rider_id).await?.is_none() {
            return Err(DomainError::not_found("rider"));
        }
        Ok(self.store.events_for_rider(rider_id).await?)
    }

    async fn require_event(&self, event_id: EventId) -> DomainResult<Event> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or_else(|| DomainError::not_found("event"))
    }
}
