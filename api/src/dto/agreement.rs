use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rh_core::domain::entities::AgreementTerms;
use rh_core::services::AgreementDraft;

/// Body of agreement create and edit requests
///
/// Due date and rent are checked against the engine's clock by
/// `RentalAgreementService::validate_terms`, not by field rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementRequest {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub due_date: NaiveDate,
    pub monthly_rent: Decimal,
}

impl From<AgreementRequest> for AgreementDraft {
    fn from(request: AgreementRequest) -> Self {
        Self {
            property_id: request.property_id,
            tenant_id: request.tenant_id,
            terms: AgreementTerms {
                due_date: request.due_date,
                monthly_rent: request.monthly_rent,
            },
        }
    }
}
