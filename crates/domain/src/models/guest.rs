//! Guest identity and intake models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validation::MissingFields;
use shared::validation::{non_blank, normalize_email};

/// Global guest identity. One identity may hold registrations for many events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Guest {
    pub id: Uuid,
    pub full_name: String,
    /// Always stored trimmed and lowercased.
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Self-registration body submitted from the intake form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterGuestRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub id_number: Option<String>,
    pub id_document_url: Option<String>,
    pub dietary_restrictions: Option<String>,
}

impl RegisterGuestRequest {
    /// Checks that every required field is present, then normalises the rest.
    pub fn into_new_registration(self) -> Result<NewRegistration, MissingFields> {
        MissingFields::check(&[
            ("fullName", self.full_name.as_deref()),
            ("email", self.email.as_deref()),
            ("idNumber", self.id_number.as_deref()),
            ("idDocumentUrl", self.id_document_url.as_deref()),
        ])?;

        Ok(NewRegistration {
            full_name: self.full_name.unwrap_or_default().trim().to_string(),
            email: normalize_email(&self.email.unwrap_or_default()),
            phone: non_blank(self.phone),
            id_number: self.id_number.unwrap_or_default().trim().to_string(),
            id_document_url: self.id_document_url.unwrap_or_default().trim().to_string(),
            dietary_restrictions: non_blank(self.dietary_restrictions),
        })
    }
}

/// Registration fields after presence checks and normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewRegistration {
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 320, message = "Email must be at most 320 characters"))]
    pub email: String,
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 100, message = "ID number must be 1-100 characters"))]
    pub id_number: String,
    #[validate(length(min = 1, max = 2048, message = "ID document URL must be 1-2048 characters"))]
    pub id_document_url: String,
    #[validate(length(max = 1000, message = "Dietary restrictions must be at most 1000 characters"))]
    pub dietary_restrictions: Option<String>,
}

/// Guest portal login body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestLoginRequest {
    pub email: Option<String>,
    pub access_code: Option<String>,
}

impl GuestLoginRequest {
    /// Both credentials are present and non-blank.
    pub fn is_complete(&self) -> bool {
        !shared::validation::is_blank(self.email.as_deref())
            && !shared::validation::is_blank(self.access_code.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use serde_json::json;

    fn full_request() -> RegisterGuestRequest {
        RegisterGuestRequest {
            full_name: Some(Name().fake()),
            email: Some(SafeEmail().fake()),
            phone: None,
            id_number: Some("P1234567".into()),
            id_document_url: Some("https://files.example.com/id/1.png".into()),
            dietary_restrictions: None,
        }
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let req: RegisterGuestRequest = serde_json::from_value(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "idNumber": "X1",
            "idDocumentUrl": "https://x/1",
            "dietaryRestrictions": "vegan"
        }))
        .unwrap();
        assert_eq!(req.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(req.dietary_restrictions.as_deref(), Some("vegan"));
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let err = RegisterGuestRequest {
            email: Some("a@x.com".into()),
            ..Default::default()
        }
        .into_new_registration()
        .unwrap_err();
        assert_eq!(err.0, vec!["fullName", "idNumber", "idDocumentUrl"]);
    }

    #[test]
    fn test_email_is_normalised() {
        let mut req = full_request();
        req.email = Some("  Ada@Example.COM ".into());
        let reg = req.into_new_registration().unwrap();
        assert_eq!(reg.email, "ada@example.com");
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let mut req = full_request();
        req.phone = Some("  ".into());
        req.dietary_restrictions = Some("".into());
        let reg = req.into_new_registration().unwrap();
        assert_eq!(reg.phone, None);
        assert_eq!(reg.dietary_restrictions, None);
    }

    #[test]
    fn test_new_registration_validation() {
        let valid = full_request().into_new_registration().unwrap();
        assert!(valid.validate().is_ok());

        let mut bad_email = full_request();
        bad_email.email = Some("not-an-email".into());
        let reg = bad_email.into_new_registration().unwrap();
        assert!(reg.validate().is_err());
    }

    #[test]
    fn test_login_request_completeness() {
        let req: GuestLoginRequest =
            serde_json::from_value(json!({"email": "a@x.com", "accessCode": "a1b2c3"})).unwrap();
        assert!(req.is_complete());

        let req: GuestLoginRequest = serde_json::from_value(json!({"email": "a@x.com"})).unwrap();
        assert!(!req.is_complete());

        let req: GuestLoginRequest =
            serde_json::from_value(json!({"email": " ", "accessCode": "A1B2C3"})).unwrap();
        assert!(!req.is_complete());
    }
}
