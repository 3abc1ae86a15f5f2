//! User entity representing a registered user of RentalHub.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::UserSummary;

/// User entity representing a registered user
///
/// A user may own properties, broker them, occupy at most one, and take
/// either side of a rental agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Login e-mail, unique across users
    pub email: String,

    /// Display name
    pub full_name: String,

    /// Contact phone
    pub phone: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Consecutive failed logins since the last success
    pub failed_login_attempts: u32,

    /// Logins are refused until this instant
    pub locked_until: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(
        email: String,
        full_name: String,
        phone: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            full_name,
            phone,
            password_hash,
            failed_login_attempts: 0,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks whether logins are currently refused
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if until > now)
    }

    /// Counts a failed login and locks the account once `max_attempts` is reached
    ///
    /// Returns the lock expiry when this failure triggered a lock.
    pub fn record_failed_login(
        &mut self,
        max_attempts: u32,
        lock_duration: Duration,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        self.failed_login_attempts += 1;
        self.updated_at = now;

        if self.failed_login_attempts >= max_attempts {
            let until = now + lock_duration;
            self.locked_until = Some(until);
            self.failed_login_attempts = 0;
            return Some(until);
        }
        None
    }

    /// Clears the failure counter after a successful login
    pub fn reset_failed_logins(&mut self, now: DateTime<Utc>) {
        if self.failed_login_attempts != 0 || self.locked_until.is_some() {
            self.failed_login_attempts = 0;
            self.locked_until = None;
            self.updated_at = now;
        }
    }

    /// Replaces the editable profile fields
    pub fn update_profile(&mut self, full_name: String, email: String, phone: String, now: DateTime<Utc>) {
        self.full_name = full_name;
        self.email = email;
        self.phone = phone;
        self.updated_at = now;
    }

    /// Public projection without credentials
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
        }
    }
}
