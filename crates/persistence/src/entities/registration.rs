//! Registration row mappings.
//!
//! Registrations are always read joined with their guest identity, so each
//! entity here matches one projection of `event_registrations JOIN guests`.

use chrono::{DateTime, Utc};
use domain::models::{
    GuestPortalView, InvalidState, RegistrationCredentials, RegistrationDetail,
    RegistrationSummary, VerificationState,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Converts a stored state code, surfacing bad rows as decode errors.
pub fn decode_state(code: i16) -> Result<VerificationState, sqlx::Error> {
    VerificationState::try_from(code).map_err(|e: InvalidState| sqlx::Error::Decode(Box::new(e)))
}

/// Full admin projection.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationDetailEntity {
    pub guest_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub id_number: String,
    pub id_document_url: String,
    pub dietary_restrictions: Option<String>,
    pub current_state: i16,
    pub error_log: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RegistrationDetailEntity> for RegistrationDetail {
    type Error = sqlx::Error;

    fn try_from(entity: RegistrationDetailEntity) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: entity.guest_id,
            full_name: entity.full_name,
            email: entity.email,
            phone: entity.phone,
            id_number: entity.id_number,
            id_document_url: entity.id_document_url,
            dietary_restrictions: entity.dietary_restrictions,
            current_state: decode_state(entity.current_state)?,
            error_log: entity.error_log,
            registered_at: entity.registered_at,
            updated_at: entity.updated_at,
        })
    }
}

/// List projection without identity documents.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationSummaryEntity {
    pub guest_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub current_state: i16,
    pub registered_at: DateTime<Utc>,
}

impl TryFrom<RegistrationSummaryEntity> for RegistrationSummary {
    type Error = sqlx::Error;

    fn try_from(entity: RegistrationSummaryEntity) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: entity.guest_id,
            full_name: entity.full_name,
            email: entity.email,
            phone: entity.phone,
            current_state: decode_state(entity.current_state)?,
            registered_at: entity.registered_at,
        })
    }
}

/// Login projection: the portal view plus the stored access code.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialsEntity {
    pub guest_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub current_state: i16,
    pub id_document_url: String,
    pub dietary_restrictions: Option<String>,
    pub error_log: Option<String>,
    pub access_code: String,
}

impl TryFrom<CredentialsEntity> for RegistrationCredentials {
    type Error = sqlx::Error;

    fn try_from(entity: CredentialsEntity) -> Result<Self, sqlx::Error> {
        Ok(Self {
            access_code: entity.access_code,
            view: GuestPortalView {
                id: entity.guest_id,
                full_name: entity.full_name,
                email: entity.email,
                phone: entity.phone,
                current_state: decode_state(entity.current_state)?,
                id_document_url: entity.id_document_url,
                dietary_restrictions: entity.dietary_restrictions,
                error_log: entity.error_log,
            },
        })
    }
}
