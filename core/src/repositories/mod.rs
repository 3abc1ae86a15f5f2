//! Repository interfaces implemented by the infrastructure layer.

mod agreement;
mod property;
mod user;

pub use agreement::{AgreementRepository, OccupancyChange};
pub use property::PropertyRepository;
pub use user::UserRepository;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockStore;
