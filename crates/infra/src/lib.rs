//! Infrastructure layer: persistence for users, events, riders and attendance.

pub mod store;

pub use store::{
    AttendeeRepository, EventRepository, InMemoryStore, RiderRepository, SqliteStore, Store,
    StoreError, StoreResult, UserRepository,
};
