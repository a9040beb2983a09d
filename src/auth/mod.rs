//! Authentication module for Anonce.
//!
//! This module provides password hashing, role checks and the user account
//! service.

mod password;
pub mod permission;
mod service;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use permission::{check_role, require_admin};
pub use service::{Signup, UserService, INVALID_CREDENTIALS};
