//! Rental agreement repository trait.
//!
//! The store is the only shared mutable resource of the agreement engine.
//! It owns two guarantees the engine relies on:
//!
//! - at most one agreement per property (unique `property_id`), reported as
//!   `DomainError::Conflict` when violated;
//! - `save_with_occupancy` writes the agreement and the occupant change of
//!   one property atomically, and only while the stored row still matches
//!   the copy the caller read.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::rental_agreement::RentalAgreement;
use crate::domain::value_objects::AgreementDetails;
use crate::errors::DomainError;

/// Occupant write that must commit together with an agreement write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyChange {
    /// Property whose occupant is written
    pub property_id: Uuid,

    /// New occupant; `None` vacates the property
    pub occupant_id: Option<Uuid>,
}

impl OccupancyChange {
    pub fn occupy(property_id: Uuid, tenant_id: Uuid) -> Self {
        Self { property_id, occupant_id: Some(tenant_id) }
    }

    pub fn vacate(property_id: Uuid) -> Self {
        Self { property_id, occupant_id: None }
    }
}

/// Repository trait for RentalAgreement persistence operations
#[async_trait]
pub trait AgreementRepository: Send + Sync {
    /// Find an agreement by id
    ///
    /// # Returns
    /// * `Ok(Some(RentalAgreement))` - Agreement found
    /// * `Ok(None)` - No agreement with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentalAgreement>, DomainError>;

    /// Find the agreement referencing a property, open or closed
    ///
    /// Used for the one-agreement-per-property check.
    async fn find_by_property_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<RentalAgreement>, DomainError>;

    /// Find an agreement with property (and its parties), landlord and tenant
    /// resolved
    async fn find_details(&self, id: Uuid) -> Result<Option<AgreementDetails>, DomainError>;

    /// Insert a new agreement
    ///
    /// # Returns
    /// * `Ok(RentalAgreement)` - The stored agreement
    /// * `Err(DomainError::Conflict)` - Another agreement already references
    ///   the property
    async fn create(&self, agreement: RentalAgreement) -> Result<RentalAgreement, DomainError>;

    /// Update an existing agreement and, in the same transaction, apply an
    /// optional occupant change
    ///
    /// Either both writes are committed or neither is.
    ///
    /// # Arguments
    /// * `agreement` - Agreement with all fields to persist
    /// * `expected` - Agreement as the caller read it; the stored row must
    ///   still be identical
    /// * `occupancy` - Occupant write to apply atomically with it
    ///
    /// # Returns
    /// * `Ok(RentalAgreement)` - The stored agreement
    /// * `Err(DomainError::NotFound)` - Agreement or property vanished
    /// * `Err(DomainError::Conflict)` - Another agreement already references
    ///   the agreement's property, or the stored row no longer matches
    ///   `expected`
    async fn save_with_occupancy(
        &self,
        agreement: RentalAgreement,
        expected: &RentalAgreement,
        occupancy: Option<OccupancyChange>,
    ) -> Result<RentalAgreement, DomainError>;

    /// Delete an agreement permanently
    ///
    /// # Returns
    /// * `Ok(true)` - Agreement was deleted
    /// * `Ok(false)` - Agreement not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
