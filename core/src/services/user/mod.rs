//! User directory service module
//!
//! Registration, password login with account lockout, and self-service
//! profile edit and deletion.

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::UserServiceConfig;
pub use service::{RegisterUser, UpdateProfile, UserService};
