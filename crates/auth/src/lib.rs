//! `paddock-auth` — session credentials and single-owner authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage: it validates
//! registration input, issues/verifies session tokens, hashes passwords and
//! decides ownership. Loading users is the caller's job.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod token;
pub mod user;

pub use authorize::{Decision, authorize, ensure_owner};
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use password::{Argon2Hasher, CredentialHasher, HashError};
pub use token::{TokenError, TokenService};
pub use user::{Credentials, NewUser, PublicUser, Registration, RegistrationSecret, User, require_secret};
