//! Repository implementations for database operations.

pub mod event;
pub mod guest;
pub mod registration;

pub use event::EventRepository;
pub use guest::GuestRepository;
pub use registration::{RegisterOutcome, RegistrationRepository, StateUpdateOutcome};
