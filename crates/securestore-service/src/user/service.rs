//! Registration and login.

use std::sync::Arc;

use tracing::info;

use securestore_auth::jwt::{IssuedToken, JwtEncoder};
use securestore_auth::password::PasswordHasher;
use securestore_core::error::AppError;
use securestore_database::UserStore;
use securestore_entity::user::{CreateUser, User};

/// Minimum account password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Manages user accounts and issues session tokens.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Session token issuer.
    encoder: Arc<JwtEncoder>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
        }
    }

    /// Registers a new account.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let username = username.trim();
        let email = email.trim().to_lowercase();
        if username.is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }
        if !email.contains('@') {
            return Err(AppError::validation("Email address is invalid"));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let user = self
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email,
                password_hash: self.hasher.hash_password(password)?,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verifies credentials and issues a session token.
    ///
    /// Unknown email and wrong password produce the same error.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AppError> {
        let invalid = || AppError::unauthorized("Invalid email or password");

        let user = self
            .users
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(invalid());
        }

        let token = self.encoder.issue(user.id)?;
        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }
}
