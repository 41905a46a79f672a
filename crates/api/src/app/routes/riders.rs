use std::sync::Arc;

use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use paddock_core::RiderId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::CurrentUser;

pub fn public_router() -> Router {
    Router::new()
        .route("/riders", get(list_riders))
        .route("/riders/:id", get(get_rider))
}

pub fn protected_router() -> Router {
    Router::new()
        .route("/riders", axum::routing::post(create_rider))
        .route("/riders/:id", axum::routing::put(update_rider).delete(delete_rider))
}

pub async fn create_rider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    body: Result<Json<dto::RiderRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.create_rider(&current, details).await {
        Ok(rider) => (StatusCode::CREATED, Json(rider)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_riders(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.list_riders().await {
        Ok(riders) => Json(riders).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_rider(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RiderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.get_rider(id).await {
        Ok(rider) => Json(rider).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_rider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    body: Result<Json<dto::RiderRequest>, JsonRejection>,
) -> axum::response::Response {
    let id: RiderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let details = match body.into_details() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.update_rider(&current, id, details).await {
        Ok(rider) => Json(rider).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_rider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RiderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.delete_rider(&current, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
