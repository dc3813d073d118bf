//! Guest verification state machine.
//!
//! Every admin transition goes through [`plan_transition`] under a
//! [`TransitionPolicy`]. The admin API uses [`PermissivePolicy`], which lets
//! any valid state move to any other valid state, including itself.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::VerificationState;

/// A transition that has been accepted and is ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: VerificationState,
    pub to: VerificationState,
    /// Error note to store. Only ever `Some` when `to` is `Error`.
    pub error_log: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Rejected transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transition from {from} to {to} is not allowed")]
pub struct TransitionError {
    pub from: VerificationState,
    pub to: VerificationState,
}

/// Decides which state pairs are legal.
pub trait TransitionPolicy: Send + Sync {
    fn allows(&self, from: VerificationState, to: VerificationState) -> bool;
}

/// Admins may move a registration between any two states.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissivePolicy;

impl TransitionPolicy for PermissivePolicy {
    fn allows(&self, _from: VerificationState, _to: VerificationState) -> bool {
        true
    }
}

/// Plans a transition, or rejects it when `policy` does not allow the pair.
///
/// The error note is trimmed and kept only when the target is `Error`;
/// moving to any other state clears it.
pub fn plan_transition<P: TransitionPolicy + ?Sized>(
    policy: &P,
    from: VerificationState,
    to: VerificationState,
    error_log: Option<&str>,
) -> Result<StateTransition, TransitionError> {
    if !policy.allows(from, to) {
        return Err(TransitionError { from, to });
    }

    let error_log = match to {
        VerificationState::Error => error_log
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(String::from),
        _ => None,
    };

    Ok(StateTransition {
        from,
        to,
        error_log,
        changed_at: Utc::now(),
    })
}
