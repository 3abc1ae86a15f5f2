//! Rental agreement engine
//!
//! Creation, amendment, deletion and the two-party signature protocol of
//! rental agreements. Enforces one agreement per property and derives the
//! property's occupant from a completed signature.

mod service;

#[cfg(test)]
mod tests;

pub use service::{AgreementDraft, RentalAgreementService};
pub use service::messages;
