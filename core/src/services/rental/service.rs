//! Rental agreement engine implementation

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::rental_agreement::{AgreementTerms, RentalAgreement, SigningParty};
use crate::domain::value_objects::AgreementDetails;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{AgreementRepository, OccupancyChange, PropertyRepository, UserRepository};
use crate::services::clock::Clock;

/// User-facing rejection messages
pub mod messages {
    pub const SAME_PARTY: &str =
        "A user cannot be both landlord and tenant of the same rental agreement.";
    pub const AGREEMENT_NOT_FOUND: &str = "Rental agreement with the specified id does not exist.";
    pub const PROPERTY_NOT_FOUND: &str = "Property with the specified id does not exist.";
    pub const PROPERTY_TAKEN: &str = "Property already has a rental agreement.";
    pub const NOT_OWNER: &str = "Only the property owner can create or edit rental agreements for it.";
    pub const TENANT_NOT_FOUND: &str = "User specified as tenant does not exist.";
    pub const LANDLORD_NOT_FOUND: &str = "User specified as landlord does not exist.";
    pub const NOT_LANDLORD_EDIT: &str = "Only the landlord can edit this rental agreement.";
    pub const NOT_LANDLORD_DELETE: &str = "Only the landlord can delete this rental agreement.";
    pub const NOT_PARTY: &str = "Only the landlord or the tenant can sign this rental agreement.";
    pub const AGREEMENT_CHANGED: &str =
        "Rental agreement was changed by another request. Reload it and try again.";
    pub use crate::domain::entities::rental_agreement::ALREADY_SIGNED;
}

use messages::*;

/// Property, tenant and terms of an agreement being written
#[derive(Debug, Clone)]
pub struct AgreementDraft {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub terms: AgreementTerms,
}

/// Service implementing the rental agreement lifecycle
///
/// Every operation takes the acting user explicitly and issues its store
/// reads and writes in a fixed order: validate, fetch related entities,
/// mutate, persist. Failures are returned at the point of detection.
pub struct RentalAgreementService<A, P, U>
where
    A: AgreementRepository,
    P: PropertyRepository,
    U: UserRepository,
{
    agreement_repository: Arc<A>,
    property_repository: Arc<P>,
    user_repository: Arc<U>,
    /// Source of closing timestamps
    clock: Arc<dyn Clock>,
}

impl<A, P, U> RentalAgreementService<A, P, U>
where
    A: AgreementRepository,
    P: PropertyRepository,
    U: UserRepository,
{
    /// Create a new rental agreement service
    ///
    /// # Arguments
    ///
    /// * `agreement_repository` - Agreement persistence, owner of the
    ///   one-per-property key and the occupancy transaction
    /// * `property_repository` - Property lookups
    /// * `user_repository` - Landlord and tenant lookups
    /// * `clock` - Time source for closing timestamps
    pub fn new(
        agreement_repository: Arc<A>,
        property_repository: Arc<P>,
        user_repository: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            agreement_repository,
            property_repository,
            user_repository,
            clock,
        }
    }

    /// Check the caller-facing preconditions on agreement terms
    ///
    /// The due date must be strictly after today according to the injected
    /// clock and the monthly rent must be above zero.
    pub fn validate_terms(&self, terms: &AgreementTerms) -> DomainResult<()> {
        terms.validate(self.clock.today())?;
        Ok(())
    }

    /// Create an agreement for a property owned by the acting user
    ///
    /// # Returns
    ///
    /// * `Ok(AgreementDetails)` - New agreement awaiting both signatures
    /// * `Err(DomainError::BadRequest)` - Tenant is the acting user
    /// * `Err(DomainError::NotFound)` - Property or tenant does not exist
    /// * `Err(DomainError::Conflict)` - Property already has an agreement
    /// * `Err(DomainError::Unauthorized)` - Acting user does not own the property
    pub async fn create(&self, draft: AgreementDraft, acting_user_id: Uuid) -> DomainResult<AgreementDetails> {
        // Step 1: Landlord and tenant must differ
        if draft.tenant_id == acting_user_id {
            return Err(DomainError::bad_request(SAME_PARTY));
        }

        // Step 2: Property exists and is free
        let property = self
            .property_repository
            .find_by_id(draft.property_id)
            .await?
            .ok_or_else(|| DomainError::not_found(PROPERTY_NOT_FOUND))?;

        if self
            .agreement_repository
            .find_by_property_id(property.id)
            .await?
            .is_some()
        {
            warn!(property_id = %property.id, "Agreement creation rejected: property already has one");
            return Err(DomainError::conflict(PROPERTY_TAKEN));
        }

        // Step 3: Only the owner rents it out
        if !property.is_owned_by(acting_user_id) {
            warn!(property_id = %property.id, %acting_user_id, "Agreement creation rejected: not the owner");
            return Err(DomainError::unauthorized(NOT_OWNER));
        }

        // Step 4: Resolve both parties
        let tenant = self
            .user_repository
            .find_by_id(draft.tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found(TENANT_NOT_FOUND))?;
        let landlord = self
            .user_repository
            .find_by_id(acting_user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(LANDLORD_NOT_FOUND))?;

        // Step 5: Persist; the store's unique key rejects a concurrent twin
        let agreement = RentalAgreement::new(
            property.id,
            landlord.id,
            tenant.id,
            draft.terms,
            self.clock.now(),
        );
        let agreement = self.agreement_repository.create(agreement).await?;
        info!(
            agreement_id = %agreement.id,
            property_id = %agreement.property_id,
            tenant_id = %agreement.tenant_id,
            "Rental agreement created"
        );

        self.details(agreement.id).await
    }

    /// Replace property, tenant and terms of an agreement
    ///
    /// Both signatures are voided and the previous property is vacated, in
    /// one transaction with the agreement write.
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::BadRequest)` - New tenant is the acting user
    /// * `Err(DomainError::NotFound)` - Agreement, new property or tenant missing
    /// * `Err(DomainError::Unauthorized)` - Acting user is not the landlord,
    ///   or does not own the new property
    /// * `Err(DomainError::Conflict)` - New property hosts another agreement,
    ///   or a signature landed while the edit was in flight
    pub async fn edit(
        &self,
        agreement_id: Uuid,
        draft: AgreementDraft,
        acting_user_id: Uuid,
    ) -> DomainResult<AgreementDetails> {
        // Step 1: Landlord and tenant must differ
        if draft.tenant_id == acting_user_id {
            return Err(DomainError::bad_request(SAME_PARTY));
        }

        // Step 2: Agreement exists and belongs to the acting landlord
        let mut agreement = self.find(agreement_id).await?;
        if agreement.landlord_id != acting_user_id {
            warn!(%agreement_id, %acting_user_id, "Agreement edit rejected: not the landlord");
            return Err(DomainError::unauthorized(NOT_LANDLORD_EDIT));
        }

        // Step 3: New property exists, hosts no other agreement, and is owned
        let property = self
            .property_repository
            .find_by_id(draft.property_id)
            .await?
            .ok_or_else(|| DomainError::not_found(PROPERTY_NOT_FOUND))?;

        if let Some(existing) = self.agreement_repository.find_by_property_id(property.id).await? {
            if existing.id != agreement.id {
                warn!(%agreement_id, property_id = %property.id, "Agreement edit rejected: property already has one");
                return Err(DomainError::conflict(PROPERTY_TAKEN));
            }
        }

        if !property.is_owned_by(acting_user_id) {
            warn!(%agreement_id, property_id = %property.id, "Agreement edit rejected: not the owner");
            return Err(DomainError::unauthorized(NOT_OWNER));
        }

        // Step 4: New tenant exists
        let tenant = self
            .user_repository
            .find_by_id(draft.tenant_id)
            .await?
            .ok_or_else(|| DomainError::not_found(TENANT_NOT_FOUND))?;

        // Step 5: The prior tenancy ends with the old terms
        let vacate = self
            .property_repository
            .find_by_id(agreement.property_id)
            .await?
            .filter(|previous| previous.is_rented())
            .map(|previous| OccupancyChange::vacate(previous.id));

        // Step 6: Amend and persist atomically
        let read = agreement.clone();
        agreement.amend(property.id, tenant.id, draft.terms, self.clock.now());
        let agreement = self
            .agreement_repository
            .save_with_occupancy(agreement, &read, vacate)
            .await?;
        info!(
            %agreement_id,
            property_id = %agreement.property_id,
            tenant_id = %agreement.tenant_id,
            vacated = vacate.is_some(),
            "Rental agreement amended; signatures reset"
        );

        self.details(agreement.id).await
    }

    /// Delete an agreement; only its landlord may
    pub async fn delete(&self, agreement_id: Uuid, acting_user_id: Uuid) -> DomainResult<()> {
        let agreement = self.find(agreement_id).await?;
        if agreement.landlord_id != acting_user_id {
            warn!(%agreement_id, %acting_user_id, "Agreement deletion rejected: not the landlord");
            return Err(DomainError::unauthorized(NOT_LANDLORD_DELETE));
        }

        if !self.agreement_repository.delete(agreement_id).await? {
            return Err(DomainError::not_found(AGREEMENT_NOT_FOUND));
        }
        info!(%agreement_id, property_id = %agreement.property_id, "Rental agreement deleted");
        Ok(())
    }

    /// Record the acting user's signature
    ///
    /// When the other party has already signed, this closes the agreement:
    /// the closing timestamp comes from the injected clock and the tenant
    /// becomes the property's occupant in the same transaction.
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::NotFound)` - Agreement missing, or property or
    ///   tenant vanished before closing
    /// * `Err(DomainError::Unauthorized)` - Acting user is neither party
    /// * `Err(DomainError::BadRequest)` - Acting user already signed
    /// * `Err(DomainError::Conflict)` - Another signature or edit landed
    ///   between the read and the write
    pub async fn sign(&self, agreement_id: Uuid, acting_user_id: Uuid) -> DomainResult<AgreementDetails> {
        let mut agreement = self.find(agreement_id).await?;

        let Some(party) = agreement.party_of(acting_user_id) else {
            warn!(%agreement_id, %acting_user_id, "Signature rejected: not a party");
            return Err(DomainError::unauthorized(NOT_PARTY));
        };

        let read = agreement.clone();
        let closed = agreement.sign(party, self.clock.now())?;

        let occupancy = if closed {
            let property = self
                .property_repository
                .find_by_id(agreement.property_id)
                .await?
                .ok_or_else(|| DomainError::not_found(PROPERTY_NOT_FOUND))?;
            let tenant = self
                .user_repository
                .find_by_id(agreement.tenant_id)
                .await?
                .ok_or_else(|| DomainError::not_found(TENANT_NOT_FOUND))?;
            Some(OccupancyChange::occupy(property.id, tenant.id))
        } else {
            None
        };

        let agreement = self
            .agreement_repository
            .save_with_occupancy(agreement, &read, occupancy)
            .await?;

        match party {
            SigningParty::Landlord => info!(%agreement_id, "Landlord signed rental agreement"),
            SigningParty::Tenant => info!(%agreement_id, "Tenant signed rental agreement"),
        }
        if let Some(closed_at) = agreement.closed_at.filter(|_| closed) {
            info!(
                %agreement_id,
                property_id = %agreement.property_id,
                occupant_id = %agreement.tenant_id,
                %closed_at,
                "Rental agreement closed"
            );
        }

        self.details(agreement.id).await
    }

    /// Fully materialized agreement
    pub async fn get_by_id(&self, agreement_id: Uuid) -> DomainResult<AgreementDetails> {
        self.details(agreement_id).await
    }

    async fn find(&self, agreement_id: Uuid) -> DomainResult<RentalAgreement> {
        self.agreement_repository
            .find_by_id(agreement_id)
            .await?
            .ok_or_else(|| DomainError::not_found(AGREEMENT_NOT_FOUND))
    }

    async fn details(&self, agreement_id: Uuid) -> DomainResult<AgreementDetails> {
        self.agreement_repository
            .find_details(agreement_id)
            .await?
            .ok_or_else(|| DomainError::not_found(AGREEMENT_NOT_FOUND))
    }
}
