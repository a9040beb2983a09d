//! Anonce repository.

use sqlx::SqlitePool;

use super::types::{Anonce, AnonceWithAuthor};
use crate::db::UserSummary;
use crate::{AnonceError, Result};

const ANONCE_COLUMNS: &str = "id, title, content, author_id, created_at, updated_at";

const ANONCE_WITH_AUTHOR: &str = r#"
    SELECT a.id, a.title, a.content, a.author_id, a.created_at, a.updated_at,
           u.name AS author_name, u.email AS author_email
    FROM anonces a
    JOIN users u ON u.id = a.author_id
"#;

/// Repository for anonce CRUD operations.
pub struct AnonceRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnonceRepository<'a> {
    /// Create a new AnonceRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an anonce, generating an ID when none is given.
    pub async fn create(
        &self,
        id: Option<&str>,
        title: &str,
        content: &str,
        author_id: &str,
    ) -> Result<Anonce> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        sqlx::query("INSERT INTO anonces (id, title, content, author_id) VALUES ($1, $2, $3, $4)")
            .bind(&id)
            .bind(title)
            .bind(content)
            .bind(author_id)
            .execute(self.pool)
            .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| AnonceError::NotFound("anonce".to_string()))
    }

    /// Replace title and content, bumping updated_at.
    ///
    /// Returns the updated anonce, or None if not found.
    pub async fn update(&self, id: &str, title: &str, content: &str) -> Result<Option<Anonce>> {
        let result = sqlx::query(
            "UPDATE anonces SET title = $1, content = $2, updated_at = datetime('now') WHERE id = $3",
        )
        .bind(title)
        .bind(content)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Get an anonce by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Anonce>> {
        let sql = format!("SELECT {ANONCE_COLUMNS} FROM anonces WHERE id = $1");
        let anonce = sqlx::query_as::<_, Anonce>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(anonce)
    }

    /// Get an anonce with its author.
    pub async fn get_with_author(&self, id: &str) -> Result<Option<AnonceWithAuthor>> {
        let sql = format!("{ANONCE_WITH_AUTHOR} WHERE a.id = $1");
        let row = sqlx::query_as::<_, AnonceAuthorRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(AnonceAuthorRow::into_anonce))
    }

    /// All anonces with their authors, newest first.
    pub async fn list_with_author(&self) -> Result<Vec<AnonceWithAuthor>> {
        let sql = format!("{ANONCE_WITH_AUTHOR} ORDER BY a.created_at DESC, a.rowid DESC");
        let rows = sqlx::query_as::<_, AnonceAuthorRow>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(AnonceAuthorRow::into_anonce).collect())
    }

    /// Delete an anonce. Comments and read receipts cascade.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM anonces WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Internal struct for mapping joined rows to AnonceWithAuthor.
#[derive(sqlx::FromRow)]
struct AnonceAuthorRow {
    id: String,
    title: String,
    content: String,
    author_id: String,
    created_at: String,
    updated_at: String,
    author_name: String,
    author_email: String,
}

impl AnonceAuthorRow {
    fn into_anonce(self) -> AnonceWithAuthor {
        AnonceWithAuthor {
            author: UserSummary {
                id: self.author_id.clone(),
                name: self.author_name,
                email: self.author_email,
            },
            id: self.id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, Role, UserRepository};
    use crate::Database;

    async fn setup() -> (Database, String) {
        let db = Database::open_in_memory().await.unwrap();
        let admin = UserRepository::new(db.pool())
            .create(&NewUser::new("admin@example.com", "h", "Admin").with_role(Role::Admin))
            .await
            .unwrap();
        (db, admin.id)
    }

    #[tokio::test]
    async fn test_create_with_and_without_id() {
        let (db, admin_id) = setup().await;
        let repo = AnonceRepository::new(db.pool());

        let generated = repo
            .create(None, "Title", "Some content", &admin_id)
            .await
            .unwrap();
        assert!(uuid::Uuid::parse_str(&generated.id).is_ok());

        let id = uuid::Uuid::new_v4().to_string();
        let given = repo
            .create(Some(&id), "Title", "Some content", &admin_id)
            .await
            .unwrap();
        assert_eq!(given.id, id);
    }

    #[tokio::test]
    async fn test_update() {
        let (db, admin_id) = setup().await;
        let repo = AnonceRepository::new(db.pool());
        let anonce = repo
            .create(None, "Title", "Some content", &admin_id)
            .await
            .unwrap();

        let updated = repo
            .update(&anonce.id, "New title", "New content here")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.content, "New content here");
        assert!(repo.update("missing", "t", "c").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_with_author_newest_first() {
        let (db, admin_id) = setup().await;
        let repo = AnonceRepository::new(db.pool());
        repo.create(None, "First", "Some content", &admin_id)
            .await
            .unwrap();
        repo.create(None, "Second", "Some content", &admin_id)
            .await
            .unwrap();

        let list = repo.list_with_author().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "Second");
        assert_eq!(list[0].author.name, "Admin");
    }

    #[tokio::test]
    async fn test_delete() {
        let (db, admin_id) = setup().await;
        let repo = AnonceRepository::new(db.pool());
        let anonce = repo
            .create(None, "Title", "Some content", &admin_id)
            .await
            .unwrap();

        assert!(repo.delete(&anonce.id).await.unwrap());
        assert!(repo.get_with_author(&anonce.id).await.unwrap().is_none());
        assert!(!repo.delete(&anonce.id).await.unwrap());
    }
}
