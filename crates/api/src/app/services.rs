use std::sync::{Arc, OnceLock};

use anyhow::Context;

use paddock_attendance::AttendanceManager;
use paddock_auth::{
    Argon2Hasher, CredentialHasher, Credentials, PublicUser, Registration, RegistrationSecret, TokenService,
};
use paddock_core::{DomainError, DomainResult, EventId, RiderId};
use paddock_infra::{InMemoryStore, SqliteStore, Store};
use paddock_racing::{Event, EventDetails, Rider, RiderDetails};

use crate::authz::authorize_mutation;
use crate::config::AppConfig;
use crate::context::CurrentUser;

const BAD_CREDENTIALS: &str = "invalid email or password";
const UNKNOWN_USER_PASSWORD: &str = "paddock-unknown-user";

/// Everything the handlers need, built once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub attendance: AttendanceManager,
    register_secret: RegistrationSecret,
    /// Verified against when the email is unknown, hashed on first use.
    unknown_user_digest: Arc<OnceLock<String>>,
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let store = SqliteStore::connect(url, config.store_timeout)
                .await
                .with_context(|| format!("failed to open database {url}"))?;
            tracing::info!(database_url = %url, "using sqlite store");
            Arc::new(store)
        }
        None => {
            tracing::info!("using in-memory store");
            Arc::new(InMemoryStore::new())
        }
    };

    Ok(AppServices::new(store, config))
}

impl AppServices {
    pub fn new(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        let tokens = TokenService::new(config.jwt_secret.as_bytes()).with_ttl(config.token_ttl);
        Self {
            attendance: AttendanceManager::new(store.clone()),
            store,
            tokens: Arc::new(tokens),
            hasher: Arc::new(Argon2Hasher::new()),
            register_secret: RegistrationSecret::new(config.register_secret.clone()),
            unknown_user_digest: Arc::new(OnceLock::new()),
        }
    }

    // -------------------------
    // Accounts
    // -------------------------

    pub async fn register_user(&self, registration: Registration, secret: &str) -> DomainResult<PublicUser> {
        if !self.register_secret.matches(secret) {
            tracing::warn!(email = %registration.email(), "registration rejected: wrong registration secret");
            return Err(DomainError::unauthenticated("invalid registration secret"));
        }

        let digest = self.hash_password(registration.password().to_string()).await?;
        let user = self.store.insert_user(registration.into_new_user(digest)).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user.to_public())
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    ///
    /// Both paths run one Argon2 verification.
    pub async fn login(&self, credentials: Credentials) -> DomainResult<String> {
        let user = self.store.find_user_by_email(credentials.email()).await?;
        let digest = user.as_ref().map(|u| u.password_digest.clone());
        let verified = self
            .verify_password(digest, credentials.password().to_string())
            .await?;

        let user = match user {
            Some(user) if verified => user,
            Some(user) => {
                tracing::warn!(user_id = %user.id, "login failed: wrong password");
                return Err(DomainError::unauthenticated(BAD_CREDENTIALS));
            }
            None => {
                tracing::warn!(email = %credentials.email(), "login failed: unknown email");
                return Err(DomainError::unauthenticated(BAD_CREDENTIALS));
            }
        };

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(token)
    }

    /// `None` verifies against a stand-in digest and always yields `false`.
    async fn verify_password(&self, digest: Option<String>, password: String) -> DomainResult<bool> {
        let hasher = self.hasher.clone();
        let unknown_user_digest = self.unknown_user_digest.clone();
        tokio::task::spawn_blocking(move || -> DomainResult<bool> {
            let Some(digest) = digest else {
                let stand_in = match unknown_user_digest.get() {
                    Some(d) => d,
                    None => {
                        let fresh = hasher.hash(UNKNOWN_USER_PASSWORD)?;
                        unknown_user_digest.get_or_init(|| fresh)
                    }
                };
                hasher.verify(stand_in, &password);
                return Ok(false);
            };
            Ok(hasher.verify(&digest, &password))
        })
        .await
        .map_err(|e| DomainError::storage(format!("password verification task failed: {e}")))?
    }

    /// Argon2 is CPU-bound; keep it off the async workers.
    async fn hash_password(&self, password: String) -> DomainResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::storage(format!("password hashing task failed: {e}")))?
            .map_err(DomainError::from)
    }

    // -------------------------
    // Events
    // -------------------------

    pub async fn create_event(&self, current: &CurrentUser, details: EventDetails) -> DomainResult<Event> {
        let event = self.store.insert_event(current.id(), details).await?;
        tracing::info!(user_id = %current.id(), event_id = %event.id, "event created");
        Ok(event)
    }

    pub async fn get_event(&self, id: EventId) -> DomainResult<Event> {
        self.store
            .find_event(id)
            .await?
            .ok_or_else(|| DomainError::not_found("event"))
    }

    pub async fn list_events(&self) -> DomainResult<Vec<Event>> {
        Ok(self.store.list_events().await?)
    }

    pub async fn update_event(&self, current: &CurrentUser, id: EventId, details: EventDetails) -> DomainResult<Event> {
        authorize_mutation(self.store.find_event(id).await?, current)?;
        self.store
            .update_event(id, details)
            .await?
            .ok_or_else(|| DomainError::not_found("event"))
    }

    pub async fn delete_event(&self, current: &CurrentUser, id: EventId) -> DomainResult<()> {
        authorize_mutation(self.store.find_event(id).await?, current)?;
        if !self.store.delete_event(id).await? {
            return Err(DomainError::not_found("event"));
        }
        tracing::info!(user_id = %current.id(), event_id = %id, "event deleted");
        Ok(())
    }

    // -------------------------
    // Riders
    // -------------------------

    pub async fn create_rider(&self, current: &CurrentUser, details: RiderDetails) -> DomainResult<Rider> {
        let rider = self.store.insert_rider(current.id(), details).await?;
        tracing::info!(user_id = %current.id(), rider_id = %rider.id, "rider created");
        Ok(rider)
    }

    pub async fn get_rider(&self, id: RiderId) -> DomainResult<Rider> {
        self.store
            .find_rider(id)
            .await?
            .ok_or_else(|| DomainError::not_found("rider"))
    }

    pub async fn list_riders(&self) -> DomainResult<Vec<Rider>> {
        Ok(self.store.list_riders().await?)
    }

    pub async fn update_rider(&self, current: &CurrentUser, id: RiderId, details: RiderDetails) -> DomainResult<Rider> {
        authorize_mutation(self.store.find_rider(id).await?, current)?;
        self.store
            .update_rider(id, details)
            .await?
            .ok_or_else(|| DomainError::not_found("rider"))
    }

    pub async fn delete_rider(&self, current: &CurrentUser, id: RiderId) -> DomainResult<()> {
        authorize_mutation(self.store.find_rider(id).await?, current)?;
        if !self.store.delete_rider(id).await? {
            return Err(DomainError::not_found("rider"));
        }
        tracing::info!(user_id = %current.id(), rider_id = %id, "rider deleted");
        Ok(())
    }
}
