//! Entity traits: identity + ownership.

use crate::id::UserId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// An entity with a single recorded owner.
///
/// The owner is fixed at creation time and is the only user allowed to
/// mutate the entity.
pub trait Owned: Entity {
    /// Human-readable resource kind used in error messages ("event", "rider").
    const KIND: &'static str;

    fn owner_id(&self) -> UserId;
}
