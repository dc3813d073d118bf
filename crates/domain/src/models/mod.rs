//! Domain models for the event registry.

pub mod event;
pub mod guest;
pub mod registration;
pub mod validation;
pub mod verification_state;

pub use event::{Event, EventInput, EventRequest, PublicEvent, SLUG_REGEX};
pub use guest::{Guest, GuestLoginRequest, NewRegistration, RegisterGuestRequest};
pub use registration::{
    GuestPortalView, GuestStatus, RegisteredGuest, RegistrationCredentials, RegistrationDetail,
    RegistrationReceipt, RegistrationSummary, StateUpdateResult, UpdateStateRequest,
};
pub use validation::MissingFields;
pub use verification_state::{parse_state_filter, InvalidState, VerificationState};
