use axum::{Router, routing::get};

pub mod attendees;
pub mod auth;
pub mod events;
pub mod riders;
pub mod system;

/// Endpoints anyone may call: account creation, login and all reads.
pub fn public_router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .merge(events::public_router())
        .merge(riders::public_router())
        .merge(attendees::public_router())
}

/// Endpoints behind the auth gate. Every handler here sees a `CurrentUser`.
pub fn protected_router() -> Router {
    Router::new()
        .route("/me", get(system::me))
        .merge(events::protected_router())
        .merge(riders::protected_router())
        .merge(attendees::protected_router())
}
