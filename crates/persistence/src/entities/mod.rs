//! Database entity definitions.
//!
//! Entities map directly to database rows and are converted to domain models.

pub mod event;
pub mod guest;
pub mod registration;

pub use event::EventEntity;
pub use guest::GuestEntity;
pub use registration::{
    CredentialsEntity, RegistrationDetailEntity, RegistrationSummaryEntity,
};
