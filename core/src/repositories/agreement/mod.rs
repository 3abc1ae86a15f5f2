//! Rental agreement repository module.

mod r#trait;
pub use r#trait::{AgreementRepository, OccupancyChange};
