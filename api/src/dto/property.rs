use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use rh_core::domain::entities::Address;
use rh_core::services::PropertyListing;

/// Body of property create and edit requests
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PropertyRequest {
    #[validate(length(min = 1, max = 255))]
    pub street: String,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 50))]
    pub city: String,
    #[validate(length(min = 1, max = 50))]
    pub state: String,
    #[validate(length(min = 1, max = 255))]
    pub neighborhood: String,
    #[validate(range(min = 1))]
    pub number: i32,
    #[validate(length(max = 20))]
    pub complement: Option<String>,
    pub broker_id: Option<Uuid>,
}

impl From<PropertyRequest> for PropertyListing {
    fn from(request: PropertyRequest) -> Self {
        Self {
            address: Address {
                street: request.street,
                postal_code: request.postal_code,
                city: request.city,
                state: request.state,
                neighborhood: request.neighborhood,
                number: request.number,
                complement: request.complement.filter(|c| !c.trim().is_empty()),
            },
            broker_id: request.broker_id,
        }
    }
}
