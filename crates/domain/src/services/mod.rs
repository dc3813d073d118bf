//! Domain services for the event registry.
//!
//! Services contain business logic that operates on domain models.

pub mod notification;
pub mod verification;

pub use notification::{AccessCodeMessage, AccessCodeNotifier, NotifierError, RecordingNotifier};
pub use verification::{
    plan_transition, PermissivePolicy, StateTransition, TransitionError, TransitionPolicy,
};
