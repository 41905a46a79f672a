use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use paddock_auth::{Credentials, Registration, require_secret};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    let registration = match Registration::new(&body.email, &body.password, &body.name) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let secret = match require_secret(&body.secret) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.register_user(registration, secret).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    let credentials = match Credentials::new(&body.email, &body.password) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.login(credentials).await {
        Ok(token) => (StatusCode::OK, Json(dto::TokenResponse { token })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
