//! HTTP API for RentalHub
//!
//! The actix-web application lives in [`app`]; the binary only loads
//! configuration, picks a storage backend and serves it.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
