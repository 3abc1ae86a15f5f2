//! In-memory mock store implementing every repository trait for tests
//!
//! One state behind one lock so cascades and joins see a consistent view.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Property, RentalAgreement, User};
use crate::domain::value_objects::{AgreementDetails, PropertyDetails};
use crate::errors::DomainError;
use crate::services::agreement_messages::AGREEMENT_CHANGED;

use super::{AgreementRepository, OccupancyChange, PropertyRepository, UserRepository};

#[derive(Default)]
struct MockState {
    users: HashMap<Uuid, User>,
    properties: HashMap<Uuid, Property>,
    agreements: HashMap<Uuid, RentalAgreement>,
}

impl MockState {
    fn property_details(&self, property: &Property) -> Option<PropertyDetails> {
        let summary = |id: Option<Uuid>| id.and_then(|id| self.users.get(&id)).map(User::summary);
        Some(PropertyDetails::from_parts(
            property,
            self.users.get(&property.owner_id)?.summary(),
            summary(property.broker_id),
            summary(property.occupant_id),
        ))
    }

    fn agreement_conflicts(&self, agreement: &RentalAgreement) -> bool {
        self.agreements
            .values()
            .any(|a| a.property_id == agreement.property_id && a.id != agreement.id)
    }
}

/// Mock store for testing
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<RwLock<MockState>>,
    fail_writes: Arc<AtomicBool>,
}

impl MockStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with an internal error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::internal("injected write failure"));
        }
        Ok(())
    }

    /// Number of agreements referencing `property_id`
    pub async fn agreements_for_property(&self, property_id: Uuid) -> usize {
        let state = self.state.read().await;
        state
            .agreements
            .values()
            .filter(|a| a.property_id == property_id)
            .count()
    }

    pub async fn agreement_count(&self) -> usize {
        self.state.read().await.agreements.len()
    }
}

#[async_trait]
impl UserRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::conflict("E-mail already registered."));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user.id) {
            return Err(DomainError::not_found("User not found."));
        }
        if state.users.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(DomainError::conflict("E-mail already registered."));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if state.users.remove(&id).is_none() {
            return Ok(false);
        }

        let owned: Vec<Uuid> = state
            .properties
            .values()
            .filter(|p| p.owner_id == id)
            .map(|p| p.id)
            .collect();
        state.properties.retain(|_, p| p.owner_id != id);
        state
            .agreements
            .retain(|_, a| !owned.contains(&a.property_id) && a.tenant_id != id && a.landlord_id != id);
        for property in state.properties.values_mut() {
            if property.broker_id == Some(id) {
                property.broker_id = None;
            }
            if property.occupant_id == Some(id) {
                property.occupant_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl PropertyRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, DomainError> {
        let state = self.state.read().await;
        Ok(state.properties.get(&id).cloned())
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<PropertyDetails>, DomainError> {
        let state = self.state.read().await;
        Ok(state.properties.get(&id).and_then(|p| state.property_details(p)))
    }

    async fn list_rented(&self) -> Result<Vec<PropertyDetails>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .properties
            .values()
            .filter(|p| p.is_rented())
            .filter_map(|p| state.property_details(p))
            .collect())
    }

    async fn list_available(&self) -> Result<Vec<PropertyDetails>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .properties
            .values()
            .filter(|p| !p.is_rented())
            .filter_map(|p| state.property_details(p))
            .collect())
    }

    async fn create(&self, property: Property) -> Result<Property, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        state.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn update(&self, property: Property) -> Result<Property, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if !state.properties.contains_key(&property.id) {
            return Err(DomainError::not_found("Property not found."));
        }

        state.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if state.properties.remove(&id).is_none() {
            return Ok(false);
        }
        state.agreements.retain(|_, a| a.property_id != id);
        Ok(true)
    }
}

#[async_trait]
impl AgreementRepository for MockStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentalAgreement>, DomainError> {
        let state = self.state.read().await;
        Ok(state.agreements.get(&id).cloned())
    }

    async fn find_by_property_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<RentalAgreement>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .agreements
            .values()
            .find(|a| a.property_id == property_id)
            .cloned())
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<AgreementDetails>, DomainError> {
        let state = self.state.read().await;
        let Some(agreement) = state.agreements.get(&id) else {
            return Ok(None);
        };

        let details = state
            .properties
            .get(&agreement.property_id)
            .and_then(|p| state.property_details(p))
            .zip(state.users.get(&agreement.landlord_id))
            .zip(state.users.get(&agreement.tenant_id))
            .map(|((property, landlord), tenant)| {
                AgreementDetails::from_parts(agreement, property, landlord.summary(), tenant.summary())
            });
        Ok(details)
    }

    async fn create(&self, agreement: RentalAgreement) -> Result<RentalAgreement, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        if state.agreement_conflicts(&agreement) {
            return Err(DomainError::conflict("Property already has a rental agreement."));
        }

        state.agreements.insert(agreement.id, agreement.clone());
        Ok(agreement)
    }

    async fn save_with_occupancy(
        &self,
        agreement: RentalAgreement,
        expected: &RentalAgreement,
        occupancy: Option<OccupancyChange>,
    ) -> Result<RentalAgreement, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;

        // Validate everything before touching either record
        let stored = state
            .agreements
            .get(&agreement.id)
            .ok_or_else(|| DomainError::not_found("Rental agreement not found."))?;
        if stored != expected {
            return Err(DomainError::conflict(AGREEMENT_CHANGED));
        }
        if state.agreement_conflicts(&agreement) {
            return Err(DomainError::conflict("Property already has a rental agreement."));
        }
        if let Some(change) = occupancy {
            let property = state
                .properties
                .get_mut(&change.property_id)
                .ok_or_else(|| DomainError::not_found("Property not found."))?;
            property.occupant_id = change.occupant_id;
        }

        state.agreements.insert(agreement.id, agreement.clone());
        Ok(agreement)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        Ok(state.agreements.remove(&id).is_some())
    }
}
