//! Business services containing domain logic and use cases.

mod clock;
mod identity;
mod property;
mod rental;
mod token;
mod user;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use identity::IdentityResolver;
pub use property::{PropertyListing, PropertyService};
pub use rental::{messages as agreement_messages, AgreementDraft, RentalAgreementService};
pub use token::{TokenService, TokenServiceConfig};
pub use user::{RegisterUser, UpdateProfile, UserService, UserServiceConfig};
