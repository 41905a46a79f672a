//! API-side ownership guard for mutations.
//!
//! Handlers load the target resource and pass it here together with the
//! request's [`CurrentUser`]; resources and storage stay auth-agnostic.

use paddock_auth::ensure_owner;
use paddock_core::{DomainResult, Owned};

use crate::context::CurrentUser;

/// Existence first (`NotFound`), then ownership (`Forbidden`).
pub fn authorize_mutation<R: Owned>(resource: Option<R>, current: &CurrentUser) -> DomainResult<R> {
    ensure_owner(resource, current.id())
}
