//! User account service: signup, signin, listing and removal.

use tracing::info;
use validator::ValidateEmail;

use crate::auth::password::{hash_password, validate_password, verify_password, PasswordError};
use crate::auth::permission::require_admin;
use crate::config::AdminConfig;
use crate::db::{Database, NewUser, Role, User, UserRepository};
use crate::{AnonceError, Result};

/// Message returned for any failed signin.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Signup data.
#[derive(Debug, Clone)]
pub struct Signup {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Display name.
    pub name: String,
}

/// Service for user accounts.
pub struct UserService<'a> {
    db: &'a Database,
}

impl<'a> UserService<'a> {
    /// Create a new UserService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a new account.
    ///
    /// New accounts always get the USER role.
    pub async fn signup(&self, signup: &Signup) -> Result<User> {
        let email = signup.email.trim();
        if !email.validate_email() {
            return Err(AnonceError::Validation("Invalid email address".to_string()));
        }
        if signup.name.trim().is_empty() {
            return Err(AnonceError::Validation("Name must not be empty".to_string()));
        }
        validate_password(&signup.password).map_err(|e| AnonceError::Validation(e.to_string()))?;

        let repo = UserRepository::new(self.db.pool());
        if repo.email_exists(email).await? {
            return Err(AnonceError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let hash = hash_password(&signup.password).map_err(password_error)?;
        let user = repo
            .create(&NewUser::new(email, hash, signup.name.trim()))
            .await
            .map_err(|e| match e {
                AnonceError::Conflict(_) => {
                    AnonceError::Conflict("User with this email already exists".to_string())
                }
                other => other,
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials.
    ///
    /// Unknown email and wrong password fail with the same message.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = UserRepository::new(self.db.pool())
            .get_by_email(email.trim())
            .await?
            .ok_or_else(|| AnonceError::Permission(INVALID_CREDENTIALS.to_string()))?;

        verify_password(password, &user.password)
            .map_err(|_| AnonceError::Permission(INVALID_CREDENTIALS.to_string()))?;

        info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    /// All accounts.
    pub async fn find_all(&self) -> Result<Vec<User>> {
        UserRepository::new(self.db.pool()).list_all().await
    }

    /// One account by ID.
    pub async fn find_one(&self, id: &str) -> Result<User> {
        UserRepository::new(self.db.pool())
            .get_by_id(id)
            .await?
            .ok_or_else(|| AnonceError::NotFound("user".to_string()))
    }

    /// Delete an account. Admin only.
    pub async fn remove(&self, actor_id: &str, id: &str) -> Result<User> {
        require_admin(self.db.pool(), actor_id, "delete users").await?;

        let user = self.find_one(id).await?;
        UserRepository::new(self.db.pool()).delete(id).await?;

        info!(user_id = %user.id, actor_id, "User deleted");
        Ok(user)
    }

    /// Create the configured administrator if no account uses its email.
    ///
    /// Returns the new account, or None when nothing was created.
    pub async fn bootstrap_admin(&self, config: &AdminConfig) -> Result<Option<User>> {
        if !config.is_configured() {
            return Ok(None);
        }

        let repo = UserRepository::new(self.db.pool());
        if repo.email_exists(&config.email).await? {
            return Ok(None);
        }

        validate_password(&config.password).map_err(|e| {
            AnonceError::Config(format!("admin.password: {e}"))
        })?;
        let hash = hash_password(&config.password).map_err(password_error)?;
        let admin = repo
            .create(&NewUser::new(&config.email, hash, &config.name).with_role(Role::Admin))
            .await?;

        info!(user_id = %admin.id, email = %admin.email, "Administrator account created");
        Ok(Some(admin))
    }
}

fn password_error(e: PasswordError) -> AnonceError {
    match e {
        PasswordError::TooShort | PasswordError::TooLong => AnonceError::Validation(e.to_string()),
        other => AnonceError::Internal(other.to_string()),
    }
}
