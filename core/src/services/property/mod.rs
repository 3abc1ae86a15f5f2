//! Property registry service module

mod service;

#[cfg(test)]
mod tests;

pub use service::{PropertyListing, PropertyService};
