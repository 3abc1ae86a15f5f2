//! Rental agreement entity and its two-party signature state machine.
//!
//! An agreement starts awaiting both signatures. The second signature closes
//! it; amending its terms sends it back to awaiting signatures.
//! `closed_at` is set if and only if both parties have signed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult, ValidationError};

pub const ALREADY_SIGNED: &str = "You have already signed this rental agreement.";

/// Lifecycle state derived from the signature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementStatus {
    AwaitingSignatures,
    Closed,
}

/// Which side of the agreement a user signs for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningParty {
    Landlord,
    Tenant,
}

/// Commercial terms of an agreement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementTerms {
    pub due_date: NaiveDate,
    pub monthly_rent: Decimal,
}

impl AgreementTerms {
    /// Checks the caller-facing preconditions: rent above zero and a due
    /// date strictly after `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.monthly_rent <= Decimal::ZERO {
            return Err(ValidationError::NotPositive { field: "monthly_rent".to_string() });
        }
        if self.due_date <= today {
            return Err(ValidationError::NotInFuture { field: "due_date".to_string() });
        }
        Ok(())
    }
}

/// Rental agreement entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalAgreement {
    pub id: Uuid,
    pub property_id: Uuid,

    /// Owner of the property when the agreement was written
    pub landlord_id: Uuid,
    pub tenant_id: Uuid,

    pub landlord_signed: bool,
    pub tenant_signed: bool,

    /// Instant the second signature was recorded
    pub closed_at: Option<DateTime<Utc>>,

    pub due_date: NaiveDate,
    pub monthly_rent: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RentalAgreement {
    /// Creates an unsigned agreement
    pub fn new(
        property_id: Uuid,
        landlord_id: Uuid,
        tenant_id: Uuid,
        terms: AgreementTerms,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            landlord_id,
            tenant_id,
            landlord_signed: false,
            tenant_signed: false,
            closed_at: None,
            due_date: terms.due_date,
            monthly_rent: terms.monthly_rent,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> AgreementStatus {
        if self.closed_at.is_some() {
            AgreementStatus::Closed
        } else {
            AgreementStatus::AwaitingSignatures
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status() == AgreementStatus::Closed
    }

    /// Role `user_id` plays in this agreement, if any
    pub fn party_of(&self, user_id: Uuid) -> Option<SigningParty> {
        if user_id == self.landlord_id {
            Some(SigningParty::Landlord)
        } else if user_id == self.tenant_id {
            Some(SigningParty::Tenant)
        } else {
            None
        }
    }

    pub fn has_signed(&self, party: SigningParty) -> bool {
        match party {
            SigningParty::Landlord => self.landlord_signed,
            SigningParty::Tenant => self.tenant_signed,
        }
    }

    /// Records `party`'s signature
    ///
    /// Returns `true` when this signature closed the agreement. Fails with
    /// `BadRequest` if the party already signed, leaving the agreement as is.
    pub fn sign(&mut self, party: SigningParty, now: DateTime<Utc>) -> DomainResult<bool> {
        if self.has_signed(party) {
            return Err(DomainError::bad_request(ALREADY_SIGNED));
        }

        match party {
            SigningParty::Landlord => self.landlord_signed = true,
            SigningParty::Tenant => self.tenant_signed = true,
        }
        self.updated_at = now;

        if self.landlord_signed && self.tenant_signed {
            self.closed_at = Some(now);
            return Ok(true);
        }
        Ok(false)
    }

    /// Replaces property, tenant and terms and voids both signatures
    pub fn amend(&mut self, property_id: Uuid, tenant_id: Uuid, terms: AgreementTerms, now: DateTime<Utc>) {
        self.property_id = property_id;
        self.tenant_id = tenant_id;
        self.due_date = terms.due_date;
        self.monthly_rent = terms.monthly_rent;
        self.landlord_signed = false;
        self.tenant_signed = false;
        self.closed_at = None;
        self.updated_at = now;
    }
}
