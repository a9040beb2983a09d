//! Permission checking for Anonce.
//!
//! Role checks run against the stored account, not the token claims, so a
//! demoted or deleted admin loses access immediately.

use sqlx::SqlitePool;

use crate::db::{Role, User, UserRepository};
use crate::{AnonceError, Result};

/// Check that a user holds at least the required role.
///
/// `action` completes the sentence "Only admins can ..." in the error.
///
/// # Examples
///
/// ```
/// use anonce::auth::permission::check_role;
/// use anonce::db::{Role, User};
///
/// let user = User {
///     id: "u1".into(),
///     email: "jane@example.com".into(),
///     name: "Jane".into(),
///     password: String::new(),
///     role: Role::User,
///     created_at: String::new(),
/// };
/// assert!(check_role(&user, Role::User, "read").is_ok());
/// assert!(check_role(&user, Role::Admin, "delete anonces").is_err());
/// ```
pub fn check_role(user: &User, required: Role, action: &str) -> Result<()> {
    if !user.role.can_access(required) {
        return Err(AnonceError::Permission(format!("Only admins can {action}")));
    }
    Ok(())
}

/// Load the acting user and require the ADMIN role.
///
/// A missing account is reported as a permission failure, the same as a
/// non-admin one.
pub async fn require_admin(pool: &SqlitePool, user_id: &str, action: &str) -> Result<User> {
    let user = UserRepository::new(pool)
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| AnonceError::Permission(format!("Only admins can {action}")))?;

    check_role(&user, Role::Admin, action)?;
    Ok(user)
}
