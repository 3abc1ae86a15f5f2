//! Fully materialized read models.
//!
//! Repositories build these with explicit joins; nothing is fetched lazily
//! after they are returned.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Address, AgreementStatus, Property, RentalAgreement};

/// Public contact card of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: String,
}

/// Property with its owner, broker and occupant resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub id: Uuid,

    #[serde(flatten)]
    pub address: Address,

    pub owner: UserSummary,
    pub broker: Option<UserSummary>,
    pub occupant: Option<UserSummary>,
}

impl PropertyDetails {
    /// Assembles details from a property and its already-fetched parties
    pub fn from_parts(
        property: &Property,
        owner: UserSummary,
        broker: Option<UserSummary>,
        occupant: Option<UserSummary>,
    ) -> Self {
        Self {
            id: property.id,
            address: property.address.clone(),
            owner,
            broker,
            occupant,
        }
    }
}

/// Rental agreement with property, landlord and tenant resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementDetails {
    pub id: Uuid,
    pub property: PropertyDetails,
    pub landlord: UserSummary,
    pub tenant: UserSummary,
    pub landlord_signed: bool,
    pub tenant_signed: bool,
    pub status: AgreementStatus,
    pub closed_at: Option<DateTime<Utc>>,
    pub due_date: NaiveDate,
    pub monthly_rent: Decimal,
}

impl AgreementDetails {
    pub fn from_parts(
        agreement: &RentalAgreement,
        property: PropertyDetails,
        landlord: UserSummary,
        tenant: UserSummary,
    ) -> Self {
        Self {
            id: agreement.id,
            property,
            landlord,
            tenant,
            landlord_signed: agreement.landlord_signed,
            tenant_signed: agreement.tenant_signed,
            status: agreement.status(),
            closed_at: agreement.closed_at,
            due_date: agreement.due_date,
            monthly_rent: agreement.monthly_rent,
        }
    }
}
