//! Persistence layer for the event registry backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Query duration metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

pub use db::is_unique_violation;
