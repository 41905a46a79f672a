//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

const DEV_JWT_SECRET: &str = "dev-secret";
const DEV_REGISTER_SECRET: &str = "dev-register-secret";

/// Immutable application configuration.
///
/// Secrets are handed to the services that need them; nothing reads the
/// environment after startup.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub register_secret: String,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub store_timeout: Duration,
    pub token_ttl: chrono::Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url)
            .field("store_timeout", &self.store_timeout)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Local-development defaults with the given secrets.
    pub fn new(jwt_secret: impl Into<String>, register_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: jwt_secret.into(),
            register_secret: register_secret.into(),
            database_url: None,
            store_timeout: Duration::from_millis(3_000),
            token_ttl: chrono::Duration::hours(paddock_auth::TokenService::DEFAULT_TTL_HOURS),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });
        let register_secret = lookup("REGISTER_SECRET").unwrap_or_else(|| {
            tracing::warn!("REGISTER_SECRET not set; using insecure dev default");
            DEV_REGISTER_SECRET.to_string()
        });

        let mut config = Self::new(jwt_secret, register_secret);

        if let Some(addr) = lookup("PADDOCK_BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .with_context(|| format!("PADDOCK_BIND_ADDR is not a socket address: {addr}"))?;
        }

        config.database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if config.database_url.is_none() {
            tracing::warn!("DATABASE_URL not set; data lives in memory and is lost on restart");
        }

        if let Some(ms) = lookup("STORE_TIMEOUT_MS") {
            let ms: u64 = ms
                .parse()
                .with_context(|| format!("STORE_TIMEOUT_MS must be an integer, got {ms:?}"))?;
            anyhow::ensure!(ms > 0, "STORE_TIMEOUT_MS must be positive");
            config.store_timeout = Duration::from_millis(ms);
        }

        if let Some(hours) = lookup("TOKEN_TTL_HOURS") {
            let hours: i64 = hours
                .parse()
                .with_context(|| format!("TOKEN_TTL_HOURS must be an integer, got {hours:?}"))?;
            anyhow::ensure!(hours > 0, "TOKEN_TTL_HOURS must be positive");
            config.token_ttl = chrono::Duration::hours(hours);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.database_url, None);
        assert_eq!(config.store_timeout, Duration::from_secs(3));
        assert_eq!(config.token_ttl, chrono::Duration::hours(24));
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PADDOCK_BIND_ADDR", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("REGISTER_SECRET", "club-only"),
            ("DATABASE_URL", "sqlite://paddock.db"),
            ("STORE_TIMEOUT_MS", "250"),
            ("TOKEN_TTL_HOURS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.register_secret, "club-only");
        assert_eq!(config.database_url.as_deref(), Some("sqlite://paddock.db"));
        assert_eq!(config.store_timeout, Duration::from_millis(250));
        assert_eq!(config.token_ttl, chrono::Duration::hours(2));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("PADDOCK_BIND_ADDR", "nowhere")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("STORE_TIMEOUT_MS", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("TOKEN_TTL_HOURS", "0")])).is_err());
    }

    #[test]
    fn debug_hides_secrets() {
        let config = AppConfig::new("jwt-value", "register-value");
        let out = format!("{config:?}");
        assert!(!out.contains("jwt-value"));
        assert!(!out.contains("register-value"));
    }
}
