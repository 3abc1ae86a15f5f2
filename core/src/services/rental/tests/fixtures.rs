//! Shared set-up for engine tests

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::domain::entities::{Address, AgreementTerms, Property, User};
use crate::repositories::{MockStore, PropertyRepository, UserRepository};
use crate::services::clock::FixedClock;
use crate::services::rental::{AgreementDraft, RentalAgreementService};

pub type Engine = RentalAgreementService<MockStore, MockStore, MockStore>;

pub struct Fixture {
    pub store: Arc<MockStore>,
    pub clock: Arc<FixedClock>,
    pub engine: Engine,
    /// Owner of `property`
    pub landlord: Uuid,
    pub tenant: Uuid,
    pub stranger: Uuid,
    pub property: Uuid,
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap()
}

pub fn terms() -> AgreementTerms {
    AgreementTerms {
        due_date: (start() + Duration::days(30)).date_naive(),
        monthly_rent: dec!(1000),
    }
}

pub fn draft(property_id: Uuid, tenant_id: Uuid) -> AgreementDraft {
    AgreementDraft { property_id, tenant_id, terms: terms() }
}

pub async fn seed_user(store: &MockStore, name: &str) -> Uuid {
    let user = User::new(
        format!("{}@example.com", name),
        name.to_string(),
        "000".to_string(),
        "hash".to_string(),
        start(),
    );
    UserRepository::create(store, user).await.unwrap().id
}

pub async fn seed_property(store: &MockStore, owner_id: Uuid) -> Uuid {
    let address = Address {
        street: "Rua das Flores".to_string(),
        postal_code: "01000-000".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
        neighborhood: "Centro".to_string(),
        number: 42,
        complement: None,
    };
    let property = Property::new(address, owner_id, None, start());
    PropertyRepository::create(store, property).await.unwrap().id
}

pub async fn fixture() -> Fixture {
    let store = Arc::new(MockStore::new());
    let clock = Arc::new(FixedClock::new(start()));
    let engine = RentalAgreementService::new(store.clone(), store.clone(), store.clone(), clock.clone());

    let landlord = seed_user(&store, "landlord").await;
    let tenant = seed_user(&store, "tenant").await;
    let stranger = seed_user(&store, "stranger").await;
    let property = seed_property(&store, landlord).await;

    Fixture { store, clock, engine, landlord, tenant, stranger, property }
}

impl Fixture {
    pub async fn occupant_of(&self, property_id: Uuid) -> Option<Uuid> {
        PropertyRepository::find_by_id(&*self.store, property_id)
            .await
            .unwrap()
            .and_then(|p| p.occupant_id)
    }

    pub fn today(&self) -> NaiveDate {
        use crate::services::clock::Clock;
        self.clock.today()
    }
}
