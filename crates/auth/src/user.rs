//! User identity: registration input, stored record and public projection.
//!
//! The password digest only ever lives on [`User`], which is deliberately not
//! `Serialize`. Anything that leaves the process goes through [`PublicUser`].

use serde::Serialize;

use paddock_core::{DomainError, DomainResult, Entity, UserId};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_DISPLAY_NAME_LEN: usize = 2;

// ─────────────────────────────────────────────────────────────────────────────
// Stored record
// ─────────────────────────────────────────────────────────────────────────────

/// A registered user as held by the Credential Store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_digest: String,
    pub display_name: String,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.display_name.clone(),
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Response-safe view of a user (no digest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

/// A user about to be inserted. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_digest: String,
    pub display_name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// Validated, normalized registration input (plaintext password still inside).
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    email: String,
    password: String,
    display_name: String,
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

impl Registration {
    pub fn new(email: &str, password: &str, name: &str) -> DomainResult<Self> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let display_name = name.trim();
        if display_name.chars().count() < MIN_DISPLAY_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name must be at least {MIN_DISPLAY_NAME_LEN} characters"
            )));
        }

        Ok(Self {
            email,
            password: password.to_string(),
            display_name: display_name.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Drop the plaintext and keep only the digest.
    pub fn into_new_user(self, password_digest: String) -> NewUser {
        NewUser {
            email: self.email,
            password_digest,
            display_name: self.display_name,
        }
    }
}

/// Validated login input.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> DomainResult<Self> {
        let email = normalize_email(email)?;
        validate_password(password)?;
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Shared secret that gates account creation.
///
/// Loaded once from configuration; compared in constant time.
#[derive(Clone)]
pub struct RegistrationSecret(String);

impl core::fmt::Debug for RegistrationSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("RegistrationSecret(..)")
    }
}

impl RegistrationSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = candidate.as_bytes();
        if expected.len() != candidate.len() {
            return false;
        }
        expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Reject a blank registration secret before it is compared.
pub fn require_secret(candidate: &str) -> DomainResult<&str> {
    if candidate.trim().is_empty() {
        return Err(DomainError::validation("secret is required"));
    }
    Ok(candidate)
}

fn normalize_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(' ')
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("invalid email format"));
    }
    Ok(email)
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
