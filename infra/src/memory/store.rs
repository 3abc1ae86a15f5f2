use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use rh_core::agreement_messages::{AGREEMENT_CHANGED, PROPERTY_TAKEN};
use rh_core::domain::entities::{Property, RentalAgreement, User};
use rh_core::domain::value_objects::{AgreementDetails, PropertyDetails, UserSummary};
use rh_core::errors::DomainError;
use rh_core::repositories::{
    AgreementRepository, OccupancyChange, PropertyRepository, UserRepository,
};

const EMAIL_TAKEN: &str = "E-mail already registered.";

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    properties: HashMap<Uuid, Property>,
    agreements: HashMap<Uuid, RentalAgreement>,
}

impl Tables {
    fn summary(&self, id: Uuid) -> Option<UserSummary> {
        self.users.get(&id).map(User::summary)
    }

    fn property_details(&self, property: &Property) -> Option<PropertyDetails> {
        Some(PropertyDetails::from_parts(
            property,
            self.summary(property.owner_id)?,
            property.broker_id.and_then(|id| self.summary(id)),
            property.occupant_id.and_then(|id| self.summary(id)),
        ))
    }

    fn agreement_details(&self, agreement: &RentalAgreement) -> Option<AgreementDetails> {
        let property = self.properties.get(&agreement.property_id)?;
        Some(AgreementDetails::from_parts(
            agreement,
            self.property_details(property)?,
            self.summary(agreement.landlord_id)?,
            self.summary(agreement.tenant_id)?,
        ))
    }

    /// Unique key on `rental_agreements.property_id`
    fn property_taken_by_other(&self, agreement: &RentalAgreement) -> bool {
        self.agreements
            .values()
            .any(|other| other.property_id == agreement.property_id && other.id != agreement.id)
    }

    fn email_taken_by_other(&self, user: &User) -> bool {
        self.users
            .values()
            .any(|other| other.email == user.email && other.id != user.id)
    }

    fn list_properties(&self, rented: bool) -> Vec<PropertyDetails> {
        let mut properties: Vec<&Property> = self
            .properties
            .values()
            .filter(|p| p.is_rented() == rented)
            .collect();
        properties.sort_by_key(|p| p.created_at);
        properties
            .into_iter()
            .filter_map(|p| self.property_details(p))
            .collect()
    }

    /// Same effect as the schema's ON DELETE rules for a removed property
    fn cascade_property(&mut self, property_id: Uuid) {
        self.agreements.retain(|_, a| a.property_id != property_id);
    }

    /// Same effect as the schema's ON DELETE rules for a removed user
    fn cascade_user(&mut self, user_id: Uuid) {
        let owned: Vec<Uuid> = self
            .properties
            .values()
            .filter(|p| p.owner_id == user_id)
            .map(|p| p.id)
            .collect();
        for property_id in owned {
            self.properties.remove(&property_id);
            self.cascade_property(property_id);
        }

        self.agreements
            .retain(|_, a| a.landlord_id != user_id && a.tenant_id != user_id);

        for property in self.properties.values_mut() {
            if property.broker_id == Some(user_id) {
                property.broker_id = None;
            }
            if property.occupant_id == Some(user_id) {
                property.occupant_id = None;
            }
        }
    }
}

/// Process-local store implementing all repository traits
///
/// Cloning shares the underlying tables. Writes hold the table lock for
/// their whole check-then-write sequence, which makes each one atomic.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with an internal error until switched off
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn ensure_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            tracing::warn!("In-memory write rejected by failure injection");
            return Err(DomainError::internal("Storage is unavailable."));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        self.ensure_writable()?;
        let mut tables = self.tables.write().await;

        if tables.email_taken_by_other(&user) {
            return Err(DomainError::conflict(EMAIL_TAKEN));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        self.ensure_writable()?;
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&user.id) {
            return Err(DomainError::not_found("User not found."));
        }
        if tables.email_taken_by_other(&user) {
            return Err(DomainError::conflict(EMAIL_TAKEN));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.ensure_writable()?;
        let mut tables = self.tables.write().await;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.cascade_user(id);
        Ok(true)
    }
}

#[async_trait]
impl PropertyRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, DomainError> {
        Ok(self.tables.read().await.properties.get(&id).cloned())
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<PropertyDetails>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .properties
            .get(&id)
            .and_then(|p| tables.property_details(p)))
    }

    async fn list_rented(&self) -> Result<Vec<PropertyDetails>, DomainError> {
        Ok(self.tables.read().await.list_properties(true))
    }

    async fn list_available(&self) -> Result<Vec<PropertyDetails>, DomainError> {
        Ok(self.tables.read().await.list_properties(false))
    }

    async fn create(&self, property: Property) -> Result<Property, DomainError> {
        self.ensure_writable()?;
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&property.owner_id) {
            return Err(DomainError::not_found("Owner not found."));
        }
        tables.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn update(&self, property: Property) -> Result<Property, DomainError> {
        self.ensure_writable()?;
        let mut tables = self.tables.write().await;

        let Some(stored) = tables.properties.get_mut(&property.id) else {
            return Err(DomainError::not_found("Property not found."));
        };

        // Occupant is only written through agreement saves
        let occupant_id = stored.occupant_id;
        *stored = Property { occupant_id, ..property };
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.ensure_writable()?;
        let mut tables = self.tables.write().await;

        if tables.properties.remove(&id).is_none() {
            return Ok(false);
        }
        tables.cascade_property(id);
        Ok(true)
    }
}

#[async_trait]
impl AgreementRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentalAgreement>, DomainError> {
        Ok(self.tables.read().await.agreements.get(&id).cloned())
    }

    async fn find_by_property_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<RentalAgreement>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .agreements
            .values()
            .find(|a| a.property_id == property_id)
            .cloned())
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<AgreementDetails>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .agreements
            .get(&id)
            .and_then(|a| tables.agreement_details(a)))
    }

    async fn create(&self, agreement: RentalAgreement) -> Result<RentalAgreement, DomainError> {
        self.ensure_writable()?;
        let mut tables = self.tables.write().await;

        if tables.property_taken_by_other(&agreement) {
            return Err(DomainError::conflict(PROPERTY_TAKEN));
        }
        tables.agreements.insert(agreement.id, agreement.clone());
        Ok(agreement)
    }

    async fn save_with_occupancy(
        &self,
        agreement: RentalAgreement,
        expected: &RentalAgreement,
        occupancy: Option<OccupancyChange>,
    ) -> Result<RentalAgreement, DomainError> {
        self.ensure_writable()?;
        let mut tables = self.tables.write().await;

        // Every check runs before the first write
        let stored = tables
            .agreements
            .get(&agreement.id)
            .ok_or_else(|| DomainError::not_found("Rental agreement not found."))?;
        if stored != expected {
            return Err(DomainError::conflict(AGREEMENT_CHANGED));
        }
        if tables.property_taken_by_other(&agreement) {
            return Err(DomainError::conflict(PROPERTY_TAKEN));
        }
        if let Some(change) = occupancy {
            if !tables.properties.contains_key(&change.property_id) {
                return Err(DomainError::not_found("Property not found."));
            }
        }

        if let Some(change) = occupancy {
            if let Some(property) = tables.properties.get_mut(&change.property_id) {
                property.occupant_id = change.occupant_id;
                property.updated_at = agreement.updated_at;
            }
        }
        tables.agreements.insert(agreement.id, agreement.clone());

        tracing::debug!(
            agreement_id = %agreement.id,
            occupancy_changed = occupancy.is_some(),
            "Rental agreement saved"
        );
        Ok(agreement)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        self.ensure_writable()?;
        Ok(self.tables.write().await.agreements.remove(&id).is_some())
    }
}
