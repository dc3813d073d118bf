//! HTTP surface of the event registry: events, guest registration, the
//! guest portal and the admin verification ledger.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
