//! API handlers for the gateway.

pub mod anonce;
pub mod auth;
pub mod user;
pub mod vote;

pub use anonce::*;
pub use auth::*;
pub use user::*;
pub use vote::*;
