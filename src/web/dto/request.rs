//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::db::Role;

/// Signup request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password (6-128 characters).
    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    /// Requested role. Ignored: new accounts are always USER.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Signin request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SigninRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create-or-edit anonce request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AnonceRequest {
    /// Anonce to edit; a new anonce is created when absent or unknown.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Title (at least 3 characters).
    #[validate(length(min = 3, max = 200, message = "Title must be 3-200 characters"))]
    pub title: String,
    /// Body text (at least 10 characters).
    #[validate(length(min = 10, max = 10000, message = "Content must be 10-10000 characters"))]
    pub content: String,
}

/// Comment request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    /// Anonce to comment on.
    pub anonce_id: Uuid,
    /// Comment text.
    #[validate(length(min = 1, max = 10000, message = "Comment must be 1-10000 characters"))]
    pub content: String,
}

/// Vote list query.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VotesQuery {
    /// `true` to list open votes; anything else lists closed ones.
    #[serde(default)]
    pub is_active: Option<String>,
}

impl VotesQuery {
    /// Only the literal `true` selects active votes.
    pub fn is_active(&self) -> bool {
        self.is_active.as_deref() == Some("true")
    }
}
