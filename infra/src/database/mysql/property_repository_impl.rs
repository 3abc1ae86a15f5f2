//! MySQL implementation of the PropertyRepository trait.

use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use rh_core::domain::entities::Property;
use rh_core::domain::value_objects::PropertyDetails;
use rh_core::errors::DomainError;
use rh_core::repositories::PropertyRepository;

use super::rows::{
    internal, row_to_property, row_to_property_details, PROPERTY_COLUMNS, PROPERTY_DETAILS_SELECT,
};

/// MySQL implementation of PropertyRepository
pub struct MySqlPropertyRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlPropertyRepository {
    /// Create a new MySQL property repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn list_details(&self, filter: &str) -> Result<Vec<PropertyDetails>, DomainError> {
        let query = format!(
            "{} WHERE {} ORDER BY p.created_at",
            PROPERTY_DETAILS_SELECT.as_str(),
            filter
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal("Failed to list properties", e))?;

        rows.iter().map(row_to_property_details).collect()
    }
}

#[async_trait]
impl PropertyRepository for MySqlPropertyRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, DomainError> {
        let query = format!("SELECT {} FROM properties p WHERE p.id = ? LIMIT 1", PROPERTY_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to find property", e))?;

        result.as_ref().map(row_to_property).transpose()
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<PropertyDetails>, DomainError> {
        let query = format!("{} WHERE p.id = ? LIMIT 1", PROPERTY_DETAILS_SELECT.as_str());

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to load property details", e))?;

        result.as_ref().map(row_to_property_details).transpose()
    }

    async fn list_rented(&self) -> Result<Vec<PropertyDetails>, DomainError> {
        self.list_details("p.occupant_id IS NOT NULL").await
    }

    async fn list_available(&self) -> Result<Vec<PropertyDetails>, DomainError> {
        self.list_details("p.occupant_id IS NULL").await
    }

    async fn create(&self, property: Property) -> Result<Property, DomainError> {
        let query = r#"
            INSERT INTO properties (
                id, street, postal_code, city, state, neighborhood, number, complement,
                owner_id, broker_id, occupant_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let address = &property.address;
        sqlx::query(query)
            .bind(property.id.to_string())
            .bind(&address.street)
            .bind(&address.postal_code)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.neighborhood)
            .bind(address.number)
            .bind(&address.complement)
            .bind(property.owner_id.to_string())
            .bind(property.broker_id.map(|id| id.to_string()))
            .bind(property.occupant_id.map(|id| id.to_string()))
            .bind(property.created_at)
            .bind(property.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| internal("Failed to create property", e))?;

        Ok(property)
    }

    /// Listing fields only; the occupant column belongs to agreement writes
    async fn update(&self, property: Property) -> Result<Property, DomainError> {
        let query = r#"
            UPDATE properties
            SET street = ?, postal_code = ?, city = ?, state = ?, neighborhood = ?,
                number = ?, complement = ?, broker_id = ?, updated_at = ?
            WHERE id = ?
        "#;

        let address = &property.address;
        let result = sqlx::query(query)
            .bind(&address.street)
            .bind(&address.postal_code)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.neighborhood)
            .bind(address.number)
            .bind(&address.complement)
            .bind(property.broker_id.map(|id| id.to_string()))
            .bind(property.updated_at)
            .bind(property.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("Failed to update property", e))?;

        if result.rows_affected() == 0 && self.find_by_id(property.id).await?.is_none() {
            return Err(DomainError::not_found("Property not found."));
        }

        Ok(property)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("Failed to delete property", e))?;

        Ok(result.rows_affected() > 0)
    }
}
