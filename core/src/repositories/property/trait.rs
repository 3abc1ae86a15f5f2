//! Property repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::property::Property;
use crate::domain::value_objects::PropertyDetails;
use crate::errors::DomainError;

/// Repository trait for Property persistence operations
///
/// `find_details` and the list queries return fully joined read models;
/// owner, broker and occupant are resolved by the store in one go.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Find a property by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, DomainError>;

    /// Find a property with owner, broker and occupant resolved
    async fn find_details(&self, id: Uuid) -> Result<Option<PropertyDetails>, DomainError>;

    /// Properties that currently have an occupant
    async fn list_rented(&self) -> Result<Vec<PropertyDetails>, DomainError>;

    /// Properties without an occupant
    async fn list_available(&self) -> Result<Vec<PropertyDetails>, DomainError>;

    async fn create(&self, property: Property) -> Result<Property, DomainError>;

    /// Persist every field of an existing property
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No property with that id
    async fn update(&self, property: Property) -> Result<Property, DomainError>;

    /// Delete a property together with its rental agreement, if any
    ///
    /// # Returns
    /// * `Ok(true)` - Property was deleted
    /// * `Ok(false)` - Property not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
