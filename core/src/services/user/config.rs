//! Configuration for the user service

use rh_shared::config::LockoutConfig;

/// Configuration for the user service
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Failed-login lockout policy
    pub lockout: LockoutConfig,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            lockout: LockoutConfig::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl UserServiceConfig {
    pub fn new(lockout: LockoutConfig) -> Self {
        Self {
            lockout,
            ..Default::default()
        }
    }

    /// Override the bcrypt work factor
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}
