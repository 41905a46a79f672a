//! Storage abstractions and their in-memory / SQLite implementations.

mod deadline;
pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use deadline::with_deadline;
pub use in_memory::InMemoryStore;
pub use r#trait::{
    AttendeeRepository, EventRepository, RiderRepository, Store, StoreError, StoreResult,
    UserRepository,
};
pub use sqlite::SqliteStore;
