//! Guest verification state.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Verification state of one registration.
///
/// Serialised as its integer code on the wire and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VerificationState {
    /// Invited but nothing submitted yet (0). Reached only via an admin reset.
    Invited,
    /// Intake form submitted, awaiting review (1).
    Submitted,
    /// Identity verified by an admin (2).
    Verified,
    /// Rejected or flagged; recoverable by a further transition (-1).
    Error,
}

/// An integer or string that is not one of the four state codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid verification state: {0}")]
pub struct InvalidState(pub String);

impl VerificationState {
    /// State a fresh self-registration starts in.
    pub const INITIAL: VerificationState = VerificationState::Submitted;

    /// All valid states.
    pub const ALL: [VerificationState; 4] = [
        VerificationState::Invited,
        VerificationState::Submitted,
        VerificationState::Verified,
        VerificationState::Error,
    ];

    /// Integer code stored in `event_registrations.current_state`.
    pub fn code(self) -> i16 {
        match self {
            VerificationState::Invited => 0,
            VerificationState::Submitted => 1,
            VerificationState::Verified => 2,
            VerificationState::Error => -1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VerificationState::Invited => "INVITED",
            VerificationState::Submitted => "SUBMITTED",
            VerificationState::Verified => "VERIFIED",
            VerificationState::Error => "ERROR",
        }
    }

    /// Parses a JSON value; only integral numbers in the state set are accepted.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, InvalidState> {
        value
            .as_i64()
            .ok_or_else(|| InvalidState(value.to_string()))
            .and_then(Self::try_from)
    }
}

impl TryFrom<i64> for VerificationState {
    type Error = InvalidState;

    fn try_from(code: i64) -> Result<Self, InvalidState> {
        match code {
            0 => Ok(VerificationState::Invited),
            1 => Ok(VerificationState::Submitted),
            2 => Ok(VerificationState::Verified),
            -1 => Ok(VerificationState::Error),
            other => Err(InvalidState(other.to_string())),
        }
    }
}

impl TryFrom<i16> for VerificationState {
    type Error = InvalidState;

    fn try_from(code: i16) -> Result<Self, InvalidState> {
        Self::try_from(i64::from(code))
    }
}

impl From<VerificationState> for i64 {
    fn from(state: VerificationState) -> Self {
        i64::from(state.code())
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label(), self.code())
    }
}

/// Parses the optional `state` query filter.
///
/// Absent or empty means "no filter"; anything that is not one of the four
/// codes (including non-numeric input) is an error.
pub fn parse_state_filter(raw: Option<&str>) -> Result<Option<VerificationState>, InvalidState> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(v) => v,
    };

    let code: i64 = raw.parse().map_err(|_| InvalidState(raw.to_string()))?;
    VerificationState::try_from(code).map(Some)
}
