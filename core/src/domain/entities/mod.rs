//! Domain entities representing core business objects.

pub mod property;
pub mod rental_agreement;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use property::{Address, Property};
pub use rental_agreement::{AgreementStatus, AgreementTerms, RentalAgreement, SigningParty};
pub use token::Claims;
pub use user::User;
