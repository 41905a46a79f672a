//! Token Service: HS256 session tokens.
//!
//! The signing key is handed in once at construction and never changes for the
//! lifetime of the service. Verification returns only the subject; resolving
//! it to a user record is the caller's job.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use thiserror::Error;

use paddock_core::{DomainError, UserId};

use crate::claims::{SessionClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for DomainError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Signing(msg) => DomainError::storage(format!("token signing: {msg}")),
            other => DomainError::unauthenticated(other.to_string()),
        }
    }
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();

        // Expiry is checked by `validate_claims` so the clock can be injected.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(Self::DEFAULT_TTL_HOURS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: UserId) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: UserId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = SessionClaims::new(subject, now, self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        validate_claims(&data.claims, now).map_err(|e| match e {
            TokenValidationError::Expired => TokenError::Expired,
            TokenValidationError::InvalidTimeWindow => TokenError::Malformed(e.to_string()),
        })?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-signing-key")
    }

    #[test]
    fn issued_token_verifies_to_same_subject() {
        let svc = service();
        let token = svc.issue(UserId::new(17)).unwrap();
        assert_eq!(svc.verify(&token), Ok(UserId::new(17)));
    }

    #[test]
    fn token_from_other_key_has_invalid_signature() {
        let token = TokenService::new("someone-else").issue(UserId::new(1)).unwrap();
        assert_eq!(service().verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn swapped_payload_breaks_signature() {
        let svc = service();
        let alice = svc.issue(UserId::new(1)).unwrap();
        let bob = svc.issue(UserId::new(2)).unwrap();

        let a: Vec<&str> = alice.split('.').collect();
        let b: Vec<&str> = bob.split('.').collect();
        let forged = format!("{}.{}.{}", a[0], b[1], a[2]);

        assert_eq!(svc.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let issued = Utc::now() - Duration::hours(25);
        let token = svc.issue_at(UserId::new(3), issued).unwrap();
        assert_eq!(svc.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_is_valid_until_ttl_elapses() {
        let svc = service().with_ttl(Duration::minutes(5));
        let issued = Utc::now();
        let token = svc.issue_at(UserId::new(3), issued).unwrap();

        assert_eq!(svc.verify_at(&token, issued + Duration::minutes(4)), Ok(UserId::new(3)));
        assert_eq!(
            svc.verify_at(&token, issued + Duration::minutes(6)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        for raw in ["", "not-a-token", "a.b.c", "Bearer xyz"] {
            match service().verify(raw) {
                Err(TokenError::Malformed(_)) => {}
                other => panic!("{raw:?} -> {other:?}"),
            }
        }
    }

    #[test]
    fn auth_failures_map_to_unauthenticated() {
        let err: DomainError = TokenError::Expired.into();
        assert!(matches!(err, DomainError::Unauthenticated(_)));
    }
}
