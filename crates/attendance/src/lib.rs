//! `paddock-attendance` — which riders attend which events.
//!
//! The manager owns the ordering of checks (existence, then ownership, then
//! uniqueness) and leaves atomicity of the insert to the store.

pub mod manager;

pub use manager::AttendanceManager;
