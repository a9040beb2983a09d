//! Read receipt repository.

use sqlx::SqlitePool;

use super::types::{Anonce, ReadRecord, ReadWithAnonce, ReadWithUser};
use crate::db::UserSummary;
use crate::Result;

const READ_COLUMNS: &str = "id, user_id, anonce_id, read_at";

/// Repository for read receipts.
pub struct ReadRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReadRepository<'a> {
    /// Create a new ReadRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// The receipt for (user, anonce), if any.
    pub async fn find(&self, user_id: &str, anonce_id: &str) -> Result<Option<ReadRecord>> {
        let sql = format!("SELECT {READ_COLUMNS} FROM reads WHERE user_id = $1 AND anonce_id = $2");
        let record = sqlx::query_as::<_, ReadRecord>(&sql)
            .bind(user_id)
            .bind(anonce_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(record)
    }

    /// Insert a receipt, keeping the existing one if present.
    pub async fn create(&self, user_id: &str, anonce_id: &str) -> Result<ReadRecord> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO reads (id, user_id, anonce_id) VALUES ($1, $2, $3) ON CONFLICT(user_id, anonce_id) DO NOTHING",
        )
        .bind(&id)
        .bind(user_id)
        .bind(anonce_id)
        .execute(self.pool)
        .await?;

        let sql = format!("SELECT {READ_COLUMNS} FROM reads WHERE user_id = $1 AND anonce_id = $2");
        let record = sqlx::query_as::<_, ReadRecord>(&sql)
            .bind(user_id)
            .bind(anonce_id)
            .fetch_one(self.pool)
            .await?;
        Ok(record)
    }

    /// Receipts of a user with their anonces, most recent first.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<ReadWithAnonce>> {
        let rows = sqlx::query_as::<_, ReadAnonceRow>(
            r#"
            SELECT r.id, r.user_id, r.anonce_id, r.read_at,
                   a.title, a.content, a.author_id, a.created_at, a.updated_at
            FROM reads r
            JOIN anonces a ON a.id = r.anonce_id
            WHERE r.user_id = $1
            ORDER BY r.read_at DESC, r.rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ReadAnonceRow::into_read).collect())
    }

    /// Receipts of an anonce with their readers, oldest first.
    pub async fn list_by_anonce(&self, anonce_id: &str) -> Result<Vec<ReadWithUser>> {
        let rows = sqlx::query_as::<_, ReadUserRow>(
            r#"
            SELECT r.id, r.user_id, r.anonce_id, r.read_at,
                   u.name AS user_name, u.email AS user_email
            FROM reads r
            JOIN users u ON u.id = r.user_id
            WHERE r.anonce_id = $1
            ORDER BY r.read_at, r.rowid
            "#,
        )
        .bind(anonce_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ReadUserRow::into_read).collect())
    }
}

#[derive(sqlx::FromRow)]
struct ReadAnonceRow {
    id: String,
    user_id: String,
    anonce_id: String,
    read_at: String,
    title: String,
    content: String,
    author_id: String,
    created_at: String,
    updated_at: String,
}

impl ReadAnonceRow {
    fn into_read(self) -> ReadWithAnonce {
        ReadWithAnonce {
            anonce: Anonce {
                id: self.anonce_id.clone(),
                title: self.title,
                content: self.content,
                author_id: self.author_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            id: self.id,
            user_id: self.user_id,
            anonce_id: self.anonce_id,
            read_at: self.read_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReadUserRow {
    id: String,
    user_id: String,
    anonce_id: String,
    read_at: String,
    user_name: String,
    user_email: String,
}

impl ReadUserRow {
    fn into_read(self) -> ReadWithUser {
        ReadWithUser {
            user: UserSummary {
                id: self.user_id.clone(),
                name: self.user_name,
                email: self.user_email,
            },
            id: self.id,
            user_id: self.user_id,
            anonce_id: self.anonce_id,
            read_at: self.read_at,
        }
    }
}
