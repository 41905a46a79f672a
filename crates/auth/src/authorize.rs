//! Ownership Authorizer.
//!
//! Single-owner access control: the user recorded as a resource's owner may
//! mutate it, nobody else may. There are no roles or delegated grants.

use paddock_core::{DomainError, DomainResult, Owned, UserId};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Decide whether `current` may mutate a resource owned by `resource_owner`.
///
/// - No IO
/// - No panics
pub fn authorize(resource_owner: UserId, current: UserId) -> Decision {
    if resource_owner == current {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Existence first, then ownership.
///
/// `None` (the resource was not found) always wins over a denial, so a caller
/// can never evaluate ownership against a resource that does not exist.
pub fn ensure_owner<R: Owned>(resource: Option<R>, current: UserId) -> DomainResult<R> {
    let resource = resource.ok_or_else(|| DomainError::not_found(R::KIND))?;

    match authorize(resource.owner_id(), current) {
        Decision::Allow => Ok(resource),
        Decision::Deny => {
            tracing::warn!(
                kind = R::KIND,
                resource_id = %resource.id(),
                owner_id = %resource.owner_id(),
                user_id = %current,
                "ownership check denied"
            );
            Err(DomainError::forbidden(format!("you do not own this {}", R::KIND)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::{Entity, EventId};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Thing {
        id: EventId,
        owner: UserId,
    }

    impl Entity for Thing {
        type Id = EventId;
        fn id(&self) -> EventId {
            self.id
        }
    }

    impl Owned for Thing {
        const KIND: &'static str = "thing";
        fn owner_id(&self) -> UserId {
            self.owner
        }
    }

    fn thing(owner: i64) -> Thing {
        Thing {
            id: EventId::new(1),
            owner: UserId::new(owner),
        }
    }

    #[test]
    fn owner_passes() {
        let t = ensure_owner(Some(thing(7)), UserId::new(7)).unwrap();
        assert_eq!(t.owner, UserId::new(7));
    }

    #[test]
    fn non_owner_is_forbidden() {
        let err = ensure_owner(Some(thing(7)), UserId::new(8)).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn missing_resource_is_not_found_even_for_strangers() {
        let err = ensure_owner::<Thing>(None, UserId::new(8)).unwrap_err();
        assert_eq!(err, DomainError::not_found("thing"));
    }

    proptest! {
        #[test]
        fn allow_iff_ids_match(a in 1i64..1_000, b in 1i64..1_000) {
            let decision = authorize(UserId::new(a), UserId::new(b));
            prop_assert_eq!(decision.is_allowed(), a == b);
        }
    }
}
