//! Signatures racing on the same agreement

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Barrier;
use uuid::Uuid;

use crate::domain::entities::RentalAgreement;
use crate::domain::value_objects::AgreementDetails;
use crate::errors::{DomainError, ErrorKind};
use crate::repositories::{AgreementRepository, MockStore, OccupancyChange};
use crate::services::rental::{messages, RentalAgreementService};

use super::fixtures::*;

/// Holds the first two agreement reads until both have happened
struct LockstepReads {
    inner: Arc<MockStore>,
    barrier: Barrier,
    reads: AtomicUsize,
}

impl LockstepReads {
    fn new(inner: Arc<MockStore>) -> Self {
        Self { inner, barrier: Barrier::new(2), reads: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl AgreementRepository for LockstepReads {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentalAgreement>, DomainError> {
        let found = AgreementRepository::find_by_id(&*self.inner, id).await;
        if self.reads.fetch_add(1, Ordering::SeqCst) < 2 {
            self.barrier.wait().await;
        }
        found
    }

    async fn find_by_property_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<RentalAgreement>, DomainError> {
        self.inner.find_by_property_id(property_id).await
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<AgreementDetails>, DomainError> {
        AgreementRepository::find_details(&*self.inner, id).await
    }

    async fn create(&self, agreement: RentalAgreement) -> Result<RentalAgreement, DomainError> {
        AgreementRepository::create(&*self.inner, agreement).await
    }

    async fn save_with_occupancy(
        &self,
        agreement: RentalAgreement,
        expected: &RentalAgreement,
        occupancy: Option<OccupancyChange>,
    ) -> Result<RentalAgreement, DomainError> {
        self.inner.save_with_occupancy(agreement, expected, occupancy).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        AgreementRepository::delete(&*self.inner, id).await
    }
}

async fn racing_engine(
    f: &Fixture,
) -> (RentalAgreementService<LockstepReads, MockStore, MockStore>, Uuid) {
    let id = f.engine.create(draft(f.property, f.tenant), f.landlord).await.unwrap().id;
    let engine = RentalAgreementService::new(
        Arc::new(LockstepReads::new(f.store.clone())),
        f.store.clone(),
        f.store.clone(),
        f.clock.clone(),
    );
    (engine, id)
}

#[tokio::test]
async fn test_simultaneous_signatures_never_drop_one() {
    let f = fixture().await;
    let (engine, id) = racing_engine(&f).await;

    let (landlord, tenant) = tokio::join!(engine.sign(id, f.landlord), engine.sign(id, f.tenant));

    // Exactly one write lands; the other sees a moved agreement
    let (won, lost, loser) = match (landlord, tenant) {
        (Ok(won), Err(lost)) => (won, lost, f.tenant),
        (Err(lost), Ok(won)) => (won, lost, f.landlord),
        other => panic!("expected one winner, got {:?}", other),
    };
    assert_eq!(lost.kind(), ErrorKind::Conflict);
    assert_eq!(lost.to_string(), messages::AGREEMENT_CHANGED);

    let stored = AgreementRepository::find_by_id(&*f.store, id).await.unwrap().unwrap();
    assert_eq!(stored.landlord_signed, won.landlord_signed);
    assert_eq!(stored.tenant_signed, won.tenant_signed);
    assert!(stored.closed_at.is_none());
    assert_eq!(f.occupant_of(f.property).await, None);

    // The rejected party retries against the fresh state and closes it
    let closed = engine.sign(id, loser).await.unwrap();
    assert!(closed.landlord_signed && closed.tenant_signed);
    assert!(closed.closed_at.is_some());
    assert_eq!(f.occupant_of(f.property).await, Some(f.tenant));
}

#[tokio::test]
async fn test_simultaneous_double_sign_by_one_party_succeeds_once() {
    let f = fixture().await;
    let (engine, id) = racing_engine(&f).await;

    let (first, second) = tokio::join!(engine.sign(id, f.tenant), engine.sign(id, f.tenant));

    assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
    let err = first.err().or(second.err()).unwrap();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let stored = AgreementRepository::find_by_id(&*f.store, id).await.unwrap().unwrap();
    assert!(stored.tenant_signed && !stored.landlord_signed);
}

#[tokio::test]
async fn test_edit_racing_a_signature_cannot_revive_it() {
    let f = fixture().await;
    let (engine, id) = racing_engine(&f).await;
    let mut amended = draft(f.property, f.tenant);
    amended.terms.monthly_rent += rust_decimal_macros::dec!(1);

    let (edit, sign) = tokio::join!(engine.edit(id, amended, f.landlord), engine.sign(id, f.tenant));

    assert_eq!(edit.is_ok() as u8 + sign.is_ok() as u8, 1);
    let stored = AgreementRepository::find_by_id(&*f.store, id).await.unwrap().unwrap();
    match sign {
        Ok(_) => assert!(stored.tenant_signed && stored.monthly_rent == terms().monthly_rent),
        Err(err) => {
            assert_eq!(err.kind(), ErrorKind::Conflict);
            assert!(!stored.tenant_signed);
        }
    }
}
