//! Domain layer for the event registry backend.
//!
//! This crate contains:
//! - Domain models (Event, Guest, Registration, VerificationState)
//! - Request DTOs with field-level validation
//! - The verification state machine and the access-code notifier seam

pub mod models;
pub mod services;
