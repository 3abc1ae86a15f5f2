//! Property registry service implementation

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::property::{Address, Property};
use crate::domain::value_objects::PropertyDetails;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{PropertyRepository, UserRepository};
use crate::services::clock::Clock;

pub(crate) const PROPERTY_NOT_FOUND: &str = "Property with the specified id does not exist.";

/// Owner-editable fields of a property
#[derive(Debug, Clone)]
pub struct PropertyListing {
    pub address: Address,
    pub broker_id: Option<Uuid>,
}

/// Service managing property listings
///
/// The occupant field is never written here; it belongs to the rental
/// agreement engine.
pub struct PropertyService<P, U>
where
    P: PropertyRepository,
    U: UserRepository,
{
    property_repository: Arc<P>,
    user_repository: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P, U> PropertyService<P, U>
where
    P: PropertyRepository,
    U: UserRepository,
{
    pub fn new(property_repository: Arc<P>, user_repository: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            property_repository,
            user_repository,
            clock,
        }
    }

    /// List a new property owned by the acting user
    ///
    /// # Returns
    ///
    /// * `Ok(PropertyDetails)` - The vacant property
    /// * `Err(DomainError::NotFound)` - Acting user or broker does not exist
    pub async fn create(&self, listing: PropertyListing, acting_user_id: Uuid) -> DomainResult<PropertyDetails> {
        if self.user_repository.find_by_id(acting_user_id).await?.is_none() {
            return Err(DomainError::not_found("User with the specified id does not exist."));
        }
        self.ensure_broker_exists(listing.broker_id).await?;

        let property = Property::new(listing.address, acting_user_id, listing.broker_id, self.clock.now());
        let property = self.property_repository.create(property).await?;
        info!(property_id = %property.id, owner_id = %acting_user_id, "Property created");

        self.details(property.id).await
    }

    /// Replace address and broker of a property
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::NotFound)` - Property or broker does not exist
    /// * `Err(DomainError::Forbidden)` - Acting user is not the owner
    pub async fn edit(
        &self,
        property_id: Uuid,
        listing: PropertyListing,
        acting_user_id: Uuid,
    ) -> DomainResult<PropertyDetails> {
        let mut property = self.owned_property(property_id, acting_user_id, "edit").await?;
        self.ensure_broker_exists(listing.broker_id).await?;

        property.update_listing(listing.address, listing.broker_id, self.clock.now());
        self.property_repository.update(property).await?;
        info!(%property_id, "Property updated");

        self.details(property_id).await
    }

    /// Delete a property and its rental agreement
    pub async fn delete(&self, property_id: Uuid, acting_user_id: Uuid) -> DomainResult<()> {
        self.owned_property(property_id, acting_user_id, "delete").await?;

        if !self.property_repository.delete(property_id).await? {
            return Err(DomainError::not_found(PROPERTY_NOT_FOUND));
        }
        info!(%property_id, "Property deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, property_id: Uuid) -> DomainResult<PropertyDetails> {
        self.details(property_id).await
    }

    /// Properties with an occupant
    pub async fn list_rented(&self) -> DomainResult<Vec<PropertyDetails>> {
        self.property_repository.list_rented().await
    }

    /// Properties without an occupant
    pub async fn list_available(&self) -> DomainResult<Vec<PropertyDetails>> {
        self.property_repository.list_available().await
    }

    async fn owned_property(&self, property_id: Uuid, acting_user_id: Uuid, action: &str) -> DomainResult<Property> {
        let property = self
            .property_repository
            .find_by_id(property_id)
            .await?
            .ok_or_else(|| DomainError::not_found(PROPERTY_NOT_FOUND))?;

        if !property.is_owned_by(acting_user_id) {
            warn!(%property_id, %acting_user_id, action, "Property change rejected: not the owner");
            return Err(DomainError::forbidden(format!(
                "Only the property owner can {} it.",
                action
            )));
        }
        Ok(property)
    }

    async fn ensure_broker_exists(&self, broker_id: Option<Uuid>) -> DomainResult<()> {
        if let Some(broker_id) = broker_id {
            if self.user_repository.find_by_id(broker_id).await?.is_none() {
                return Err(DomainError::not_found("User specified as broker does not exist."));
            }
        }
        Ok(())
    }

    async fn details(&self, property_id: Uuid) -> DomainResult<PropertyDetails> {
        self.property_repository
            .find_details(property_id)
            .await?
            .ok_or_else(|| DomainError::not_found(PROPERTY_NOT_FOUND))
    }
}
