//! Per-event registration models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::verification_state::{InvalidState, VerificationState};

/// Full registration record for the admin "inspect" view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationDetail {
    /// Guest identity id.
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub id_number: String,
    pub id_document_url: String,
    pub dietary_restrictions: Option<String>,
    pub current_state: VerificationState,
    pub error_log: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the paginated admin list. Identity documents are left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub current_state: VerificationState,
    pub registered_at: DateTime<Utc>,
}

/// What a logged-in guest sees on their dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestPortalView {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub current_state: VerificationState,
    pub id_document_url: String,
    pub dietary_restrictions: Option<String>,
    pub error_log: Option<String>,
}

/// Portal view plus the stored access code, used only to check a login.
///
/// Never serialised.
#[derive(Debug, Clone)]
pub struct RegistrationCredentials {
    pub access_code: String,
    pub view: GuestPortalView,
}

/// Result of the status polling endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestStatus {
    pub current_state: VerificationState,
}

/// Admin state change body.
///
/// `new_state` is kept as raw JSON so that a missing value, a string and an
/// out-of-range integer all surface as the same validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStateRequest {
    pub new_state: Option<JsonValue>,
    pub error_log: Option<String>,
}

impl UpdateStateRequest {
    pub fn target_state(&self) -> Result<VerificationState, InvalidState> {
        match &self.new_state {
            Some(value) => VerificationState::from_json(value),
            None => Err(InvalidState("missing".to_string())),
        }
    }
}

/// Result of a state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StateUpdateResult {
    pub id: Uuid,
    pub current_state: VerificationState,
}

/// Everything known right after a registration commits.
///
/// The access code travels only to the notifier, never to the HTTP client.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub guest_id: Uuid,
    pub state: VerificationState,
    pub access_code: String,
}

/// Public response to a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredGuest {
    pub guest_id: Uuid,
}

impl From<&RegistrationReceipt> for RegisteredGuest {
    fn from(receipt: &RegistrationReceipt) -> Self {
        Self {
            guest_id: receipt.guest_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_state_request_target() {
        let req: UpdateStateRequest =
            serde_json::from_value(json!({"newState": -1, "errorLog": "blurry"})).unwrap();
        assert_eq!(req.target_state().unwrap(), VerificationState::Error);
        assert_eq!(req.error_log.as_deref(), Some("blurry"));

        let req: UpdateStateRequest = serde_json::from_value(json!({"newState": 2})).unwrap();
        assert_eq!(req.target_state().unwrap(), VerificationState::Verified);
    }

    #[test]
    fn test_update_state_request_rejects_bad_values() {
        for body in [json!({}), json!({"newState": 5}), json!({"newState": "2"}), json!({"newState": null})] {
            let req: UpdateStateRequest = serde_json::from_value(body.clone()).unwrap();
            assert!(req.target_state().is_err(), "{} accepted", body);
        }
    }

    #[test]
    fn test_registered_guest_only_exposes_id() {
        let receipt = RegistrationReceipt {
            guest_id: Uuid::nil(),
            state: VerificationState::INITIAL,
            access_code: "A1B2C3".into(),
        };
        let value = serde_json::to_value(RegisteredGuest::from(&receipt)).unwrap();
        assert_eq!(value, json!({"guestId": Uuid::nil()}));
    }

    #[test]
    fn test_portal_view_serialization() {
        let view = GuestPortalView {
            id: Uuid::nil(),
            full_name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            current_state: VerificationState::Submitted,
            id_document_url: "https://x/1".into(),
            dietary_restrictions: None,
            error_log: None,
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["current_state"], 1);
        assert!(value.get("access_code").is_none());
    }
}
