use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use paddock_core::{DomainResult, EventId, RiderId};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

// Path parameters share the `:id` name with the resource routes so the
// segment trees do not conflict.
pub fn public_router() -> Router {
    Router::new()
        .route("/events/:id/attendees", get(list_riders_for_event))
        .route("/riders/:id/events", get(list_events_for_rider))
        .route("/attendees/:id/events", get(list_events_for_rider))
}

pub fn protected_router() -> Router {
    Router::new().route(
        "/events/:id/attendees/:rider_id",
        post(register_rider).delete(unregister_rider),
    )
}

fn parse_pair(event_id: &str, rider_id: &str) -> DomainResult<(EventId, RiderId)> {
    Ok((event_id.parse()?, rider_id.parse()?))
}

pub async fn register_rider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path((event_id, rider_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (event_id, rider_id) = match parse_pair(&event_id, &rider_id) {
        Ok(ids) => ids,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.attendance.register(current.id(), event_id, rider_id).await {
        Ok(attendee) => (StatusCode::CREATED, Json(attendee)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn unregister_rider(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(current): Extension<CurrentUser>,
    Path((event_id, rider_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (event_id, rider_id) = match parse_pair(&event_id, &rider_id) {
        Ok(ids) => ids,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.attendance.unregister(current.id(), event_id, rider_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_riders_for_event(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: EventId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.attendance.list_riders_for_event(id).await {
        Ok(riders) => Json(riders).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_events_for_rider(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RiderId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.attendance.list_events_for_rider(id).await {
        Ok(events) => Json(events).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
