//! Custom Axum extractors.

pub mod admin_key;
pub mod json;

pub use admin_key::{AdminAuth, ADMIN_KEY_HEADER};
pub use json::{ApiJson, ApiQuery};
