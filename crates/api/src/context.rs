use paddock_auth::{PublicUser, User};
use paddock_core::UserId;

/// The authenticated user for one request.
///
/// Inserted into request extensions by the auth middleware and dropped with
/// the request. Handlers behind the middleware extract it with
/// `Extension<CurrentUser>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    user: PublicUser,
}

impl CurrentUser {
    pub fn new(user: &User) -> Self {
        Self {
            user: user.to_public(),
        }
    }

    pub fn id(&self) -> UserId {
        self.user.id
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn public(&self) -> &PublicUser {
        &self.user
    }
}
