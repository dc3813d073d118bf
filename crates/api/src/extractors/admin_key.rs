//! Admin gate.
//!
//! Every admin route takes [`AdminAuth`] as its first argument, so the shared
//! secret is checked before the path, query or body is looked at.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use shared::crypto::secrets_match;

/// Header carrying the admin shared secret.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

pub const MISSING_KEY_MESSAGE: &str = "Unauthorized: Admin key required.";
pub const UNCONFIGURED_MESSAGE: &str = "Internal Server Error: Security configuration missing.";
pub const INVALID_KEY_MESSAGE: &str = "Forbidden: Invalid admin credentials.";

/// Proof that the request carried the configured admin secret.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl AdminAuth {
    /// Checks a provided key against the configured secret.
    ///
    /// Missing key is 401, unconfigured server is 500 (never fail open),
    /// mismatch is 403.
    pub fn verify(configured: &str, provided: Option<&str>) -> Result<Self, ApiError> {
        let provided = match provided.map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ApiError::Unauthorized(MISSING_KEY_MESSAGE.to_string())),
        };

        let configured = configured.trim();
        if configured.is_empty() {
            return Err(ApiError::Configuration(UNCONFIGURED_MESSAGE.to_string()));
        }

        if !secrets_match(configured, provided) {
            return Err(ApiError::Forbidden(INVALID_KEY_MESSAGE.to_string()));
        }

        Ok(AdminAuth)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        let result = AdminAuth::verify(&state.config.security.admin_api_key, provided);
        if let Err(ref err) = result {
            tracing::warn!(
                path = %parts.uri.path(),
                status = err.status().as_u16(),
                "Admin gate rejected request"
            );
        }
        result
    }
}
