//! Shared utilities and common types for the event registry backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Access code generation and verification
//! - Constant-time secret comparison
//! - Offset pagination math
//! - Input normalisation helpers

pub mod access_code;
pub mod crypto;
pub mod pagination;
pub mod validation;
