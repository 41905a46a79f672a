use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use paddock_auth::{NewUser, User};
use paddock_core::{AttendeeId, EventId, RiderId, UserId};
use paddock_racing::{Attendee, Event, EventDetails, Rider, RiderDetails, RiderSummary};

use super::r#trait::{
    AttendeeRepository, DUPLICATE_ATTENDEE, DUPLICATE_EMAIL, EventRepository, RiderRepository,
    StoreError, StoreResult, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    users: BTreeMap<UserId, User>,
    events: BTreeMap<EventId, Event>,
    riders: BTreeMap<RiderId, Rider>,
    attendees: BTreeMap<AttendeeId, Attendee>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory store.
///
/// Intended for tests/dev. All tables sit behind one lock, so every write
/// (including the attendee uniqueness check + insert) is atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut t = self.write()?;
        if t.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(DUPLICATE_EMAIL.to_string()));
        }
        let id = UserId::new(t.next_id());
        let user = User {
            id,
            email: user.email,
            password_digest: user.password_digest,
            display_name: user.display_name,
        };
        t.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn insert_event(&self, owner: UserId, details: EventDetails) -> StoreResult<Event> {
        let mut t = self.write()?;
        if !t.users.contains_key(&owner) {
            return Err(StoreError::MissingReference("user".to_string()));
        }
        let event = Event::from_details(EventId::new(t.next_id()), owner, details);
        t.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: EventId) -> StoreResult<Option<Event>> {
        Ok(self.read()?.events.get(&id).cloned())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        Ok(self.read()?.events.values().cloned().collect())
    }

    async fn update_event(&self, id: EventId, details: EventDetails) -> StoreResult<Option<Event>> {
        let mut t = self.write()?;
        Ok(t.events.get_mut(&id).map(|event| {
            event.apply(details);
            event.clone()
        }))
    }

    async fn delete_event(&self, id: EventId) -> StoreResult<bool> {
        let mut t = self.write()?;
        let removed = t.events.remove(&id).is_some();
        if removed {
            t.attendees.retain(|_, a| a.event_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl RiderRepository for InMemoryStore {
    async fn insert_rider(&self, owner: UserId, details: RiderDetails) -> StoreResult<Rider> {
        let mut t = self.write()?;
        if !t.users.contains_key(&owner) {
            return Err(StoreError::MissingReference("user".to_string()));
        }
        let rider = Rider::from_details(RiderId::new(t.next_id()), owner, details);
        t.riders.insert(rider.id, rider.clone());
        Ok(rider)
    }

    async fn find_rider(&self, id: RiderId) -> StoreResult<Option<Rider>> {
        Ok(self.read()?.riders.get(&id).cloned())
    }

    async fn list_riders(&self) -> StoreResult<Vec<Rider>> {
        Ok(self.read()?.riders.values().cloned().collect())
    }

    async fn update_rider(&self, id: RiderId, details: RiderDetails) -> StoreResult<Option<Rider>> {
        let mut t = self.write()?;
        Ok(t.riders.get_mut(&id).map(|rider| {
            rider.apply(details);
            rider.clone()
        }))
    }

    async fn delete_rider(&self, id: RiderId) -> StoreResult<bool> {
        let mut t = self.write()?;
        let removed = t.riders.remove(&id).is_some();
        if removed {
            t.attendees.retain(|_, a| a.rider_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl AttendeeRepository for InMemoryStore {
    async fn insert_attendee(&self, event_id: EventId, rider_id: RiderId) -> StoreResult<Attendee> {
        let mut t = self.write()?;
        if !t.events.contains_key(&event_id) {
            return Err(StoreError::MissingReference("event".to_string()));
        }
        if !t.riders.contains_key(&rider_id) {
            return Err(StoreError::MissingReference("rider".to_string()));
        }
        if t
            .attendees
            .values()
            .any(|a| a.event_id == event_id && a.rider_id == rider_id)
        {
            return Err(StoreError::Duplicate(DUPLICATE_ATTENDEE.to_string()));
        }

        let attendee = Attendee {
            id: AttendeeId::new(t.next_id()),
            event_id,
            rider_id,
        };
        t.attendees.insert(attendee.id, attendee);
        Ok(attendee)
    }

    async fn delete_attendee(&self, event_id: EventId, rider_id: RiderId) -> StoreResult<bool> {
        let mut t = self.write()?;
        let before = t.attendees.len();
        t.attendees
            .retain(|_, a| !(a.event_id == event_id && a.rider_id == rider_id));
        Ok(t.attendees.len() != before)
    }

    async fn riders_for_event(&self, event_id: EventId) -> StoreResult<Vec<RiderSummary>> {
        let t = self.read()?;
        Ok(t.attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .filter_map(|a| t.riders.get(&a.rider_id))
            .map(Rider::summary)
            .collect())
    }

    async fn events_for_rider(&self, rider_id: RiderId) -> StoreResult<Vec<Event>> {
        let t = self.read()?;
        Ok(t.attendees
            .values()
            .filter(|a| a.rider_id == rider_id)
            .filter_map(|a| t.events.get(&a.event_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryStore, User, Event, Rider) {
        let store = InMemoryStore::new();
        let owner = store
            .insert_user(NewUser {
                email: "alice@example.com".to_string(),
                password_digest: "$argon2id$x".to_string(),
                display_name: "Alice".to_string(),
            })
            .await
            .unwrap();
        let event = store
            .insert_event(
                owner.id,
                EventDetails::parse("Hangtown", "Season opener race", "2025-05-24", "Sacramento").unwrap(),
            )
            .await
            .unwrap();
        let rider = store
            .insert_rider(
                owner.id,
                RiderDetails {
                    first_name: "Chase".to_string(),
                    last_name: "Sexton".to_string(),
                    number: 4,
                    ..Default::default()
                }
                .validated()
                .unwrap(),
            )
            .await
            .unwrap();
        (store, owner, event, rider)
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (store, owner, _, _) = seeded().await;
        let err = store
            .insert_user(NewUser {
                email: owner.email.clone(),
                password_digest: "d".to_string(),
                display_name: "Other".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Duplicate(DUPLICATE_EMAIL.to_string()));
        assert_eq!(store.find_user_by_email("alice@example.com").await.unwrap(), Some(owner));
    }

    #[tokio::test]
    async fn attendee_pair_is_unique() {
        let (store, _, event, rider) = seeded().await;
        let first = store.insert_attendee(event.id, rider.id).await.unwrap();
        assert_eq!(first.event_id, event.id);

        let err = store.insert_attendee(event.id, rider.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.riders_for_event(event.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn attendee_requires_both_sides() {
        let (store, _, event, rider) = seeded().await;
        let err = store.insert_attendee(EventId::new(999), rider.id).await.unwrap_err();
        assert_eq!(err, StoreError::MissingReference("event".to_string()));
        let err = store.insert_attendee(event.id, RiderId::new(999)).await.unwrap_err();
        assert_eq!(err, StoreError::MissingReference("rider".to_string()));
    }

    #[tokio::test]
    async fn deleting_event_cascades_to_attendance() {
        let (store, _, event, rider) = seeded().await;
        store.insert_attendee(event.id, rider.id).await.unwrap();

        assert!(store.delete_event(event.id).await.unwrap());
        assert!(store.events_for_rider(rider.id).await.unwrap().is_empty());
        assert!(store.riders_for_event(event.id).await.unwrap().is_empty());
        assert!(!store.delete_event(event.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_replaces_fields_only_for_existing_rows() {
        let (store, owner, event, _) = seeded().await;
        let details = EventDetails::parse("Pala National", "Opening round in Pala", "2025-05-31", "Pala").unwrap();

        let updated = store.update_event(event.id, details.clone()).await.unwrap().unwrap();
        assert_eq!(updated.name, "Pala National");
        assert_eq!(updated.owner_id, owner.id);

        assert_eq!(store.update_event(EventId::new(404), details).await.unwrap(), None);
    }
}
