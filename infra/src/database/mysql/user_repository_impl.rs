//! MySQL implementation of the UserRepository trait.
//!
//! Deleting a user relies on the schema's foreign keys: owned properties and
//! every agreement the user is party to are removed, broker and occupant
//! references are set to NULL.

use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use rh_core::domain::entities::User;
use rh_core::errors::DomainError;
use rh_core::repositories::UserRepository;

use super::rows::{internal, is_unique_violation, row_to_user, USER_COLUMNS};

const EMAIL_TAKEN: &str = "E-mail already registered.";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: Uuid) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT id FROM users WHERE id = ? LIMIT 1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to check user existence", e))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to find user by id", e))?;

        result.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS);

        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to find user by e-mail", e))?;

        result.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, email, full_name, phone, password_hash,
                failed_login_attempts, locked_until, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.failed_login_attempts)
            .bind(user.locked_until)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::conflict(EMAIL_TAKEN)
                } else {
                    internal("Failed to create user", e)
                }
            })?;

        tracing::debug!(user_id = %user.id, "User row inserted");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users
            SET email = ?, full_name = ?, phone = ?, password_hash = ?,
                failed_login_attempts = ?, locked_until = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.failed_login_attempts)
            .bind(user.locked_until)
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::conflict(EMAIL_TAKEN)
                } else {
                    internal("Failed to update user", e)
                }
            })?;

        // Zero affected rows is also what MySQL reports for an unchanged row
        if result.rows_affected() == 0 && !self.exists(user.id).await? {
            return Err(DomainError::not_found("User not found."));
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| internal("Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
