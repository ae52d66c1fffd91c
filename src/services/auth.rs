use std::sync::Arc;

use validator::Validate;

use crate::auth::{hash_password, verify_password, TokenKeys};
use crate::error::AppError;
use crate::models::{Credentials, User};
use crate::store::UserStore;

/// Registration and login against the credential store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: TokenKeys) -> Self {
        Self { users, keys }
    }

    /// Hashes the password and stores a new user.
    ///
    /// Fails with `AppError::ValidationError` for malformed fields or a taken username.
    pub async fn register(&self, credentials: &Credentials) -> Result<User, AppError> {
        credentials.validate()?;
        let password_hash = hash_password(&credentials.password)?;
        let user = self
            .users
            .insert_user(&credentials.username, &password_hash)
            .await?;
        log::info!("registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Verifies the credentials and issues a one-hour session token.
    ///
    /// Any failure is `AppError::invalid_credentials()`, including a username that
    /// could never have been registered.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, AppError> {
        let user = self
            .users
            .find_user_by_username(&credentials.username)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            return Err(AppError::invalid_credentials());
        }

        self.keys.generate_token(user.id, &user.username)
    }
}
