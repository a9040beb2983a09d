//! Comment repository.

use sqlx::SqlitePool;

use super::types::CommentWithAuthor;
use crate::db::UserSummary;
use crate::{AnonceError, Result};

const COMMENT_WITH_AUTHOR: &str = r#"
    SELECT c.id, c.content, c.anonce_id, c.author_id, c.created_at,
           u.name AS author_name, u.email AS author_email
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

/// Repository for comment operations.
pub struct CommentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new CommentRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a comment and return it with its author.
    pub async fn create(
        &self,
        anonce_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<CommentWithAuthor> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO comments (id, content, anonce_id, author_id) VALUES ($1, $2, $3, $4)")
            .bind(&id)
            .bind(content)
            .bind(anonce_id)
            .bind(author_id)
            .execute(self.pool)
            .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| AnonceError::NotFound("comment".to_string()))
    }

    /// Get a comment with its author.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<CommentWithAuthor>> {
        let sql = format!("{COMMENT_WITH_AUTHOR} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(CommentRow::into_comment))
    }

    /// Comments on an anonce, oldest first.
    ///
    /// With `author_id`, only that user's comments are returned.
    pub async fn list_by_anonce(
        &self,
        anonce_id: &str,
        author_id: Option<&str>,
    ) -> Result<Vec<CommentWithAuthor>> {
        let rows = match author_id {
            Some(author_id) => {
                let sql = format!(
                    "{COMMENT_WITH_AUTHOR} WHERE c.anonce_id = $1 AND c.author_id = $2 ORDER BY c.created_at, c.rowid"
                );
                sqlx::query_as::<_, CommentRow>(&sql)
                    .bind(anonce_id)
                    .bind(author_id)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{COMMENT_WITH_AUTHOR} WHERE c.anonce_id = $1 ORDER BY c.created_at, c.rowid"
                );
                sqlx::query_as::<_, CommentRow>(&sql)
                    .bind(anonce_id)
                    .fetch_all(self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }
}

/// Internal struct for mapping joined rows to CommentWithAuthor.
#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    content: String,
    anonce_id: String,
    author_id: String,
    created_at: String,
    author_name: String,
    author_email: String,
}

impl CommentRow {
    fn into_comment(self) -> CommentWithAuthor {
        CommentWithAuthor {
            author: UserSummary {
                id: self.author_id.clone(),
                name: self.author_name,
                email: self.author_email,
            },
            id: self.id,
            content: self.content,
            anonce_id: self.anonce_id,
            author_id: self.author_id,
            created_at: self.created_at,
        }
    }
}
