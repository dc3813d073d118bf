//! Event (tenant) routes.
//!
//! Public: list public events, look up one event by slug.
//! Admin: list every event, create, update.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{Event, EventRequest};
use persistence::is_unique_violation;
use persistence::repositories::EventRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson};
use crate::response::ApiResponse;

pub const EVENT_NOT_FOUND: &str = "Event not found.";
const NAME_AND_SLUG_REQUIRED: &str = "Event Name and Slug are required.";
const SLUG_EXISTS: &str = "An event with this URL slug already exists.";
const SLUG_IN_USE: &str = "The requested URL slug is already in use by another event.";

/// Resolves a slug to its event or fails with 404 "Event not found.".
pub(crate) async fn require_event(state: &AppState, slug: &str) -> Result<Event, ApiError> {
    EventRepository::new(state.pool.clone())
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(EVENT_NOT_FOUND.to_string()))
}

/// GET /api/events
pub async fn list_public_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let events = EventRepository::new(state.pool.clone()).list_public().await?;
    Ok(Json(ApiResponse::ok(events)))
}

/// GET /api/events/admin/all
pub async fn list_all_events(
    _admin: AdminAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let events = EventRepository::new(state.pool.clone()).list_all().await?;
    Ok(Json(ApiResponse::ok(events)))
}

/// GET /api/events/:slug
///
/// Does not filter on visibility: private events are reachable by slug.
pub async fn get_event_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = require_event(&state, &slug).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// POST /api/events
pub async fn create_event(
    _admin: AdminAuth,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = request
        .into_input()
        .map_err(|_| ApiError::Validation(NAME_AND_SLUG_REQUIRED.to_string()))?;
    input.validate()?;

    let repo = EventRepository::new(state.pool.clone());

    if repo.slug_exists(&input.slug).await? {
        return Err(ApiError::Conflict(SLUG_EXISTS.to_string()));
    }

    let event = repo.create(&input).await.map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict(SLUG_EXISTS.to_string())
        } else {
            e.into()
        }
    })?;

    info!(
        event_id = event.id,
        slug = %event.slug,
        is_public = event.is_public,
        "Created event"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(event).with_message("Event successfully created.")),
    ))
}

/// PATCH /api/events/:slug
///
/// Replaces name, slug, description, date and location. An absent
/// `isPublic` keeps the stored visibility.
pub async fn update_event(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(current_slug): Path<String>,
    ApiJson(request): ApiJson<EventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = request
        .into_input()
        .map_err(|_| ApiError::Validation(NAME_AND_SLUG_REQUIRED.to_string()))?;
    input.validate()?;

    let existing = require_event(&state, &current_slug).await?;
    let repo = EventRepository::new(state.pool.clone());

    if input.slug != existing.slug && repo.slug_taken_by_other(&input.slug, existing.id).await? {
        return Err(ApiError::Conflict(SLUG_IN_USE.to_string()));
    }

    let event = repo
        .update(existing.id, &input)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict(SLUG_IN_USE.to_string())
            } else {
                e.into()
            }
        })?
        .ok_or_else(|| ApiError::NotFound(EVENT_NOT_FOUND.to_string()))?;

    info!(
        event_id = event.id,
        old_slug = %existing.slug,
        slug = %event.slug,
        "Updated event"
    );

    Ok(Json(
        ApiResponse::ok(event).with_message("Event successfully updated."),
    ))
}
