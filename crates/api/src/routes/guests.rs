//! Guest registration, portal and admin ledger routes.
//!
//! Every lookup is scoped by the event resolved from the path slug, so a
//! guest id from one event never resolves inside another.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{
    parse_state_filter, GuestLoginRequest, RegisterGuestRequest, RegisteredGuest,
    StateUpdateResult, UpdateStateRequest,
};
use domain::services::{AccessCodeMessage, PermissivePolicy};
use persistence::is_unique_violation;
use persistence::repositories::{RegisterOutcome, RegistrationRepository, StateUpdateOutcome};
use serde::Deserialize;
use shared::access_code::{generate_access_code, verify_access_code};
use shared::pagination::PageRequest;
use shared::validation::normalize_email;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson, ApiQuery};
use crate::middleware::logging::STATE_CHANGE_TARGET;
use crate::middleware::metrics::{
    record_guest_registered, record_login_failure, record_state_transition,
};
use crate::response::ApiResponse;
use crate::routes::events::require_event;

const ALREADY_REGISTERED: &str = "A guest with this email is already registered for this event.";
const GUEST_NOT_FOUND: &str = "Guest not found.";
const GUEST_NOT_IN_LEDGER: &str = "Guest not found in this event ledger.";
const CREDENTIALS_REQUIRED: &str = "Email and access code are required.";
const INVALID_CREDENTIALS: &str = "Invalid email or access code.";

/// Query string of the admin list. Values stay raw so bad paging input can
/// be clamped instead of rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListGuestsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub state: Option<String>,
}

/// Malformed ids are treated like unknown ones.
fn parse_guest_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound(not_found.to_string()))
}

/// POST /api/guests/:event_slug/register
pub async fn register_guest(
    State(state): State<AppState>,
    Path(event_slug): Path<String>,
    ApiJson(request): ApiJson<RegisterGuestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = require_event(&state, &event_slug).await?;

    let registration = request.into_new_registration()?;
    registration.validate()?;

    let access_code = generate_access_code();
    let repo = RegistrationRepository::new(state.pool.clone());

    let receipt = match repo.register(event.id, &registration, &access_code).await {
        Ok(RegisterOutcome::Registered(receipt)) => receipt,
        Ok(RegisterOutcome::AlreadyRegistered) => {
            return Err(ApiError::Conflict(ALREADY_REGISTERED.to_string()))
        }
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(ALREADY_REGISTERED.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    record_guest_registered();
    info!(
        guest_id = %receipt.guest_id,
        event_id = event.id,
        state = %receipt.state,
        "Guest registered"
    );

    let message = AccessCodeMessage {
        guest_id: receipt.guest_id,
        recipient_email: registration.email.clone(),
        recipient_name: registration.full_name.clone(),
        access_code: receipt.access_code.clone(),
        event_slug: event.slug.clone(),
        event_name: event.name.clone(),
    };
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.send_access_code(&message).await {
            warn!(
                guest_id = %message.guest_id,
                event_slug = %message.event_slug,
                error = %e,
                "Access code delivery failed; registration kept"
            );
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(RegisteredGuest::from(&receipt))
                .with_message("Guest successfully registered."),
        ),
    ))
}

/// POST /api/guests/:event_slug/login
///
/// Unknown email and wrong code produce the same 401.
pub async fn login_guest(
    State(state): State<AppState>,
    Path(event_slug): Path<String>,
    ApiJson(request): ApiJson<GuestLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = require_event(&state, &event_slug).await?;

    if !request.is_complete() {
        return Err(ApiError::Validation(CREDENTIALS_REQUIRED.to_string()));
    }
    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    let provided_code = request.access_code.as_deref().unwrap_or_default();

    let credentials = RegistrationRepository::new(state.pool.clone())
        .find_credentials(event.id, &email)
        .await?;

    match credentials {
        Some(credentials) if verify_access_code(&credentials.access_code, provided_code) => {
            info!(guest_id = %credentials.view.id, event_id = event.id, "Guest portal login");
            Ok(Json(ApiResponse::ok(credentials.view)))
        }
        _ => {
            record_login_failure();
            warn!(event_id = event.id, "Guest portal login rejected");
            Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}

/// GET /api/guests/:event_slug/:guest_id/status
pub async fn get_guest_status(
    State(state): State<AppState>,
    Path((event_slug, guest_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let event = require_event(&state, &event_slug).await?;
    let guest_id = parse_guest_id(&guest_id, GUEST_NOT_FOUND)?;

    let status = RegistrationRepository::new(state.pool.clone())
        .find_status(event.id, guest_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(GUEST_NOT_FOUND.to_string()))?;

    Ok(Json(ApiResponse::ok(status)))
}

/// GET /api/guests/:event_slug
pub async fn list_guests(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(event_slug): Path<String>,
    ApiQuery(query): ApiQuery<ListGuestsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let event = require_event(&state, &event_slug).await?;

    let filter = parse_state_filter(query.state.as_deref())
        .map_err(|_| ApiError::Validation("Invalid state filter.".to_string()))?;
    let page = PageRequest::from_raw(query.page.as_deref(), query.limit.as_deref());

    let (guests, total) = RegistrationRepository::new(state.pool.clone())
        .list(event.id, filter, &page)
        .await?;

    Ok(Json(ApiResponse::paginated(guests, page.meta(total))))
}

/// GET /api/guests/:event_slug/:guest_id
pub async fn get_guest_detail(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path((event_slug, guest_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let event = require_event(&state, &event_slug).await?;
    let guest_id = parse_guest_id(&guest_id, GUEST_NOT_FOUND)?;

    let detail = RegistrationRepository::new(state.pool.clone())
        .find_detail(event.id, guest_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(GUEST_NOT_FOUND.to_string()))?;

    Ok(Json(ApiResponse::ok(detail)))
}

/// PATCH /api/guests/:event_slug/:guest_id/state
pub async fn update_guest_state(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path((event_slug, guest_id)): Path<(String, String)>,
    ApiJson(request): ApiJson<UpdateStateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = require_event(&state, &event_slug).await?;

    let target = request
        .target_state()
        .map_err(|_| ApiError::Validation("Invalid state value.".to_string()))?;
    let guest_id = parse_guest_id(&guest_id, GUEST_NOT_IN_LEDGER)?;

    let outcome = RegistrationRepository::new(state.pool.clone())
        .update_state(
            &PermissivePolicy,
            event.id,
            guest_id,
            target,
            request.error_log.as_deref(),
        )
        .await?;

    let transition = match outcome {
        StateUpdateOutcome::Applied(transition) => transition,
        StateUpdateOutcome::NotFound => {
            return Err(ApiError::NotFound(GUEST_NOT_IN_LEDGER.to_string()))
        }
        StateUpdateOutcome::Rejected(rejected) => {
            return Err(ApiError::Conflict(rejected.to_string()))
        }
    };

    info!(
        target: STATE_CHANGE_TARGET,
        guest_id = %guest_id,
        event_id = event.id,
        old_state = transition.from.code(),
        new_state = transition.to.code(),
        changed_at = %transition.changed_at,
        "Verification state changed"
    );
    record_state_transition(transition.from, transition.to);

    Ok(Json(ApiResponse::ok(StateUpdateResult {
        id: guest_id,
        current_state: transition.to,
    })))
}
