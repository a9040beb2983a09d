//! Anonce, comment and read-receipt models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::UserSummary;

/// An announcement published by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Anonce {
    /// Anonce ID (UUID).
    pub id: String,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author ID.
    pub author_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last edit timestamp.
    pub updated_at: String,
}

/// An anonce with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnonceWithAuthor {
    /// Anonce ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author ID.
    pub author_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last edit timestamp.
    pub updated_at: String,
    /// Author identity.
    pub author: UserSummary,
}

/// A comment on an anonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    /// Comment ID (UUID).
    pub id: String,
    /// Body text.
    pub content: String,
    /// Anonce commented on.
    pub anonce_id: String,
    /// Author ID.
    pub author_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Author identity.
    pub author: UserSummary,
}

/// An anonce with its author and the comments visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnonceDetails {
    /// Anonce ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Author ID.
    pub author_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last edit timestamp.
    pub updated_at: String,
    /// Author identity.
    pub author: UserSummary,
    /// Visible comments, oldest first.
    pub comments: Vec<CommentWithAuthor>,
}

impl AnonceDetails {
    /// Attach comments to an anonce.
    pub fn new(anonce: AnonceWithAuthor, comments: Vec<CommentWithAuthor>) -> Self {
        Self {
            id: anonce.id,
            title: anonce.title,
            content: anonce.content,
            author_id: anonce.author_id,
            created_at: anonce.created_at,
            updated_at: anonce.updated_at,
            author: anonce.author,
            comments,
        }
    }
}

/// Read receipt: one per (user, anonce).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReadRecord {
    /// Receipt ID (UUID).
    pub id: String,
    /// Reader.
    pub user_id: String,
    /// Anonce read.
    pub anonce_id: String,
    /// When it was first read.
    pub read_at: String,
}

/// A read receipt with its anonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadWithAnonce {
    /// Receipt ID.
    pub id: String,
    /// Reader.
    pub user_id: String,
    /// Anonce read.
    pub anonce_id: String,
    /// When it was first read.
    pub read_at: String,
    /// The anonce.
    pub anonce: Anonce,
}

/// A read receipt with its reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadWithUser {
    /// Receipt ID.
    pub id: String,
    /// Reader.
    pub user_id: String,
    /// Anonce read.
    pub anonce_id: String,
    /// When it was first read.
    pub read_at: String,
    /// Reader identity.
    pub user: UserSummary,
}

/// Data for creating or editing an anonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonceInput {
    /// Existing anonce to edit, or the ID to create with.
    pub id: Option<String>,
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
}

impl AnonceInput {
    /// Create input for a new anonce.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Target a specific anonce ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
