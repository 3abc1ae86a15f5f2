//! MySQL implementation of the AgreementRepository trait.
//!
//! The `UNIQUE (property_id)` key enforces one agreement per property; a
//! violation surfaces as `DomainError::Conflict`. Writes that move a
//! property's occupant share one transaction with the agreement row.

use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use rh_core::agreement_messages::{AGREEMENT_CHANGED, PROPERTY_TAKEN};
use rh_core::domain::entities::RentalAgreement;
use rh_core::domain::value_objects::AgreementDetails;
use rh_core::errors::DomainError;
use rh_core::repositories::{AgreementRepository, OccupancyChange};

use super::rows::{
    internal, is_unique_violation, row_to_agreement, row_to_agreement_details, AGREEMENT_COLUMNS,
    AGREEMENT_DETAILS_SELECT,
};

/// MySQL implementation of AgreementRepository
pub struct MySqlAgreementRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAgreementRepository {
    /// Create a new MySQL agreement repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, value: Uuid) -> Result<Option<RentalAgreement>, DomainError> {
        let query = format!(
            "SELECT {} FROM rental_agreements a WHERE {} = ? LIMIT 1",
            AGREEMENT_COLUMNS, filter
        );

        let result = sqlx::query(&query)
            .bind(value.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to find rental agreement", e))?;

        result.as_ref().map(row_to_agreement).transpose()
    }

    /// Lock a row inside `tx`, failing with `NotFound` when it is gone
    async fn lock_row(
        tx: &mut Transaction<'_, MySql>,
        table: &str,
        id: Uuid,
        missing: &str,
    ) -> Result<(), DomainError> {
        let query = format!("SELECT id FROM {} WHERE id = ? FOR UPDATE", table);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| internal("Failed to lock row", e))?;

        match row {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found(missing)),
        }
    }

    /// Lock the agreement row and read it as it stands now
    async fn lock_agreement(
        tx: &mut Transaction<'_, MySql>,
        id: Uuid,
    ) -> Result<RentalAgreement, DomainError> {
        let query = format!(
            "SELECT {} FROM rental_agreements a WHERE a.id = ? FOR UPDATE",
            AGREEMENT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| internal("Failed to lock rental agreement", e))?
            .ok_or_else(|| DomainError::not_found("Rental agreement not found."))?;

        row_to_agreement(&row)
    }
}

fn map_write_error(context: &str, err: sqlx::Error) -> DomainError {
    if is_unique_violation(&err) {
        DomainError::conflict(PROPERTY_TAKEN)
    } else {
        internal(context, err)
    }
}

#[async_trait]
impl AgreementRepository for MySqlAgreementRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RentalAgreement>, DomainError> {
        self.find_one("a.id", id).await
    }

    async fn find_by_property_id(
        &self,
        property_id: Uuid,
    ) -> Result<Option<RentalAgreement>, DomainError> {
        self.find_one("a.property_id", property_id).await
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<AgreementDetails>, DomainError> {
        let query = format!("{} WHERE a.id = ? LIMIT 1", AGREEMENT_DETAILS_SELECT.as_str());

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to load rental agreement details", e))?;

        result.as_ref().map(row_to_agreement_details).transpose()
    }

    async fn create(&self, agreement: RentalAgreement) -> Result<RentalAgreement, DomainError> {
        let query = r#"
            INSERT INTO rental_agreements (
                id, property_id, landlord_id, tenant_id, landlord_signed, tenant_signed,
                closed_at, due_date, monthly_rent, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(agreement.id.to_string())
            .bind(agreement.property_id.to_string())
            .bind(agreement.landlord_id.to_string())
            .bind(agreement.tenant_id.to_string())
            .bind(agreement.landlord_signed)
            .bind(agreement.tenant_signed)
            .bind(agreement.closed_at)
            .bind(agreement.due_date)
            .bind(agreement.monthly_rent)
            .bind(agreement.created_at)
            .bind(agreement.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error("Failed to create rental agreement", e))?;

        Ok(agreement)
    }

    async fn save_with_occupancy(
        &self,
        agreement: RentalAgreement,
        expected: &RentalAgreement,
        occupancy: Option<OccupancyChange>,
    ) -> Result<RentalAgreement, DomainError> {
        // Dropping the transaction on any early return rolls it back
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal("Failed to begin transaction", e))?;

        if Self::lock_agreement(&mut tx, agreement.id).await? != *expected {
            tracing::warn!(agreement_id = %agreement.id, "Stale rental agreement write rejected");
            return Err(DomainError::conflict(AGREEMENT_CHANGED));
        }

        let query = r#"
            UPDATE rental_agreements
            SET property_id = ?, tenant_id = ?, landlord_signed = ?, tenant_signed = ?,
                closed_at = ?, due_date = ?, monthly_rent = ?, updated_at = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(agreement.property_id.to_string())
            .bind(agreement.tenant_id.to_string())
            .bind(agreement.landlord_signed)
            .bind(agreement.tenant_signed)
            .bind(agreement.closed_at)
            .bind(agreement.due_date)
            .bind(agreement.monthly_rent)
            .bind(agreement.updated_at)
            .bind(agreement.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error("Failed to update rental agreement", e))?;

        if let Some(change) = occupancy {
            Self::lock_row(&mut tx, "properties", change.property_id, "Property not found.").await?;

            sqlx::query("UPDATE properties SET occupant_id = ?, updated_at = ? WHERE id = ?")
                .bind(change.occupant_id.map(|id| id.to_string()))
                .bind(agreement.updated_at)
                .bind(change.property_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| internal("Failed to update property occupant", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| internal("Failed to commit rental agreement", e))?;

        tracing::debug!(
            agreement_id = %agreement.id,
            occupancy_changed = occupancy.is_some(),
            "Rental agreement saved"
        );
        Ok(agreement)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM rental_agreements WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("Failed to delete rental agreement", e))?;

        Ok(result.rows_affected() > 0)
    }
}
