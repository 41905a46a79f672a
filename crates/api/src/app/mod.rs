//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the operations handlers call
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use paddock_infra::Store;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Version prefix shared by every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Opens the store named by the configuration.
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(router(services))
}

/// Build the router over an already constructed store.
pub fn build_app_with_store(store: Arc<dyn Store>, config: &AppConfig) -> Router {
    router(services::AppServices::new(store, config))
}

fn router(services: services::AppServices) -> Router {
    let auth_state = middleware::AuthState {
        tokens: services.tokens.clone(),
        store: services.store.clone(),
    };

    // Protected routes: the auth gate runs before any handler.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let api = routes::public_router().merge(protected);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest(API_PREFIX, api)
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(services))))
}
