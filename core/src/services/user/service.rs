//! Main user service implementation

use std::sync::Arc;

use chrono::Duration;
use once_cell::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::domain::value_objects::{LoginResponse, UserSummary};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::clock::Clock;
use crate::services::token::TokenService;

use super::config::UserServiceConfig;
use super::password::{hash_password, verify_password};

const USER_NOT_FOUND: &str = "User with the specified id does not exist.";
const EMAIL_TAKEN: &str = "E-mail already registered.";

/// Input for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Editable profile fields
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// User directory service
pub struct UserService<U>
where
    U: UserRepository,
{
    /// User repository for persistence
    user_repository: Arc<U>,
    /// Token service for issuing access tokens
    token_service: Arc<TokenService>,
    /// Time source for lockout bookkeeping
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: UserServiceConfig,
    /// Hash verified for unknown e-mails, computed on first use
    dummy_hash: OnceCell<String>,
}

impl<U> UserService<U>
where
    U: UserRepository,
{
    /// Create a new user service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_service` - Service issuing access tokens
    /// * `clock` - Time source
    /// * `config` - Lockout policy and hashing cost
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService>,
        clock: Arc<dyn Clock>,
        config: UserServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            clock,
            config,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Register a new user and log them in
    ///
    /// # Returns
    ///
    /// * `Ok(LoginResponse)` - Access token and profile of the new user
    /// * `Err(DomainError::Conflict)` - E-mail already registered
    /// * `Err(DomainError::Auth(HashingFailed))` - Password could not be hashed
    pub async fn register(&self, input: RegisterUser) -> DomainResult<LoginResponse> {
        // Step 1: Reject duplicate e-mails up front
        let email = normalize_email(&input.email);
        if self.user_repository.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Registration rejected: e-mail already registered");
            return Err(DomainError::conflict(EMAIL_TAKEN));
        }

        // Step 2: Hash the password
        let password_hash = hash_password(&input.password, self.config.bcrypt_cost)?;

        // Step 3: Persist; the store's unique key still catches races
        let user = User::new(
            email,
            input.full_name.trim().to_string(),
            input.phone.trim().to_string(),
            password_hash,
            self.clock.now(),
        );
        let user = self.user_repository.create(user).await?;
        info!(user_id = %user.id, "User registered");

        // Step 4: Issue the access token
        self.login_response(&user)
    }

    /// Authenticate with e-mail and password
    ///
    /// Unknown e-mails still run a bcrypt verification so both failure
    /// paths take the same time.
    ///
    /// # Returns
    ///
    /// * `Ok(LoginResponse)` - Credentials accepted
    /// * `Err(AuthError::InvalidCredentials)` - Unknown e-mail or wrong password
    /// * `Err(AuthError::AccountLocked)` - Too many consecutive failures
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginResponse> {
        let email = normalize_email(email);
        let now = self.clock.now();
        let lockout = &self.config.lockout;

        // Step 1: Look up the user
        let Some(mut user) = self.user_repository.find_by_email(&email).await? else {
            let _ = verify_password(password, self.dummy_hash()?);
            warn!("Login rejected: unknown e-mail");
            return Err(AuthError::InvalidCredentials.into());
        };

        // Step 2: Refuse locked accounts before looking at the password
        if lockout.enabled {
            if let Some(until) = user.locked_until.filter(|_| user.is_locked(now)) {
                warn!(user_id = %user.id, %until, "Login rejected: account locked");
                return Err(AuthError::AccountLocked { until }.into());
            }
        }

        // Step 3: Check the password and count failures
        if !verify_password(password, &user.password_hash) {
            if !lockout.enabled {
                warn!(user_id = %user.id, "Login rejected: wrong password");
                return Err(AuthError::InvalidCredentials.into());
            }

            let locked = user.record_failed_login(
                lockout.max_failed_attempts,
                Duration::minutes(lockout.lock_duration_minutes),
                now,
            );
            let user = self.user_repository.update(user).await?;

            return match locked {
                Some(until) => {
                    warn!(user_id = %user.id, %until, "Account locked after repeated failed logins");
                    Err(AuthError::AccountLocked { until }.into())
                }
                None => {
                    warn!(
                        user_id = %user.id,
                        failed_attempts = user.failed_login_attempts,
                        "Login rejected: wrong password"
                    );
                    Err(AuthError::InvalidCredentials.into())
                }
            };
        }

        // Step 4: Reset the failure counter
        if user.failed_login_attempts != 0 || user.locked_until.is_some() {
            user.reset_failed_logins(now);
            user = self.user_repository.update(user).await?;
        }

        info!(user_id = %user.id, "User logged in");
        self.login_response(&user)
    }

    /// Public profile of a user
    pub async fn get_by_id(&self, user_id: Uuid) -> DomainResult<UserSummary> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .map(|user| user.summary())
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))
    }

    /// Edit the acting user's own profile
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Forbidden)` - Acting user is not the target
    /// * `Err(DomainError::NotFound)` - Target does not exist
    /// * `Err(DomainError::Conflict)` - New e-mail belongs to another user
    pub async fn edit(
        &self,
        acting_user_id: Uuid,
        target_user_id: Uuid,
        input: UpdateProfile,
    ) -> DomainResult<UserSummary> {
        if acting_user_id != target_user_id {
            warn!(%acting_user_id, %target_user_id, "Profile edit rejected: not the account owner");
            return Err(DomainError::forbidden("You can only edit your own account."));
        }

        let mut user = self
            .user_repository
            .find_by_id(target_user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        let email = normalize_email(&input.email);
        if let Some(other) = self.user_repository.find_by_email(&email).await? {
            if other.id != user.id {
                warn!(user_id = %user.id, "Profile edit rejected: e-mail already registered");
                return Err(DomainError::conflict(EMAIL_TAKEN));
            }
        }

        user.update_profile(
            input.full_name.trim().to_string(),
            email,
            input.phone.trim().to_string(),
            self.clock.now(),
        );
        let user = self.user_repository.update(user).await?;
        info!(user_id = %user.id, "User profile updated");

        Ok(user.summary())
    }

    /// Delete the acting user's own account
    ///
    /// Owned properties and their agreements go with it; see
    /// [`UserRepository::delete`].
    pub async fn delete(&self, acting_user_id: Uuid, target_user_id: Uuid) -> DomainResult<()> {
        if acting_user_id != target_user_id {
            warn!(%acting_user_id, %target_user_id, "Account deletion rejected: not the account owner");
            return Err(DomainError::forbidden("You can only delete your own account."));
        }

        if !self.user_repository.delete(target_user_id).await? {
            return Err(DomainError::not_found(USER_NOT_FOUND));
        }

        info!(user_id = %target_user_id, "User deleted");
        Ok(())
    }

    fn login_response(&self, user: &User) -> DomainResult<LoginResponse> {
        let token = self.token_service.issue(user.id, &user.full_name)?;
        Ok(LoginResponse::new(token, self.token_service.expires_in(), user.summary()))
    }

    fn dummy_hash(&self) -> DomainResult<&str> {
        self.dummy_hash
            .get_or_try_init(|| hash_password("rentalhub-dummy-password", self.config.bcrypt_cost))
            .map(String::as_str)
    }
}

/// E-mails are compared trimmed and lowercase
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
