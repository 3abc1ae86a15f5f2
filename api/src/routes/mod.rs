//! HTTP route handlers
//!
//! - `users` - registration, login and profile management
//! - `properties` - property listings and occupancy views
//! - `agreements` - the rental agreement lifecycle
//! - `health` - liveness and storage status

pub mod agreements;
pub mod health;
pub mod properties;
pub mod users;
