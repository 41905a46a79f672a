use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::context::CurrentUser;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn me(Extension(current): Extension<CurrentUser>) -> impl IntoResponse {
    Json(current.public().clone())
}
