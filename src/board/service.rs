//! Anonce service for Anonce.
//!
//! High-level operations on anonces, comments and read receipts with
//! built-in permission checking.

use tracing::info;

use super::comment_repository::CommentRepository;
use super::read_repository::ReadRepository;
use super::repository::AnonceRepository;
use super::types::{
    AnonceDetails, AnonceInput, AnonceWithAuthor, CommentWithAuthor, ReadRecord, ReadWithAnonce,
    ReadWithUser,
};
use crate::auth::require_admin;
use crate::db::Database;
use crate::{AnonceError, Result};

/// Minimum title length (in characters).
pub const MIN_TITLE_LENGTH: usize = 3;

/// Maximum title length (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Minimum content length (in characters).
pub const MIN_CONTENT_LENGTH: usize = 10;

/// Maximum content or comment length (in characters).
pub const MAX_CONTENT_LENGTH: usize = 10_000;

fn validate_title(title: &str) -> Result<()> {
    let count = title.trim().chars().count();
    if count < MIN_TITLE_LENGTH {
        return Err(AnonceError::Validation(format!(
            "Title must be at least {MIN_TITLE_LENGTH} characters"
        )));
    }
    if count > MAX_TITLE_LENGTH {
        return Err(AnonceError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    let count = content.trim().chars().count();
    if count < MIN_CONTENT_LENGTH {
        return Err(AnonceError::Validation(format!(
            "Content must be at least {MIN_CONTENT_LENGTH} characters"
        )));
    }
    if count > MAX_CONTENT_LENGTH {
        return Err(AnonceError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_comment(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(AnonceError::Validation(
            "Comment must not be empty".to_string(),
        ));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(AnonceError::Validation(format!(
            "Comment must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Service for anonce operations with permission checking.
pub struct AnonceService<'a> {
    db: &'a Database,
}

impl<'a> AnonceService<'a> {
    /// Create a new AnonceService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an anonce, or edit it when `input.id` names an existing one.
    ///
    /// Admin only. An unknown `input.id` creates a new anonce with that ID.
    pub async fn create_or_edit(
        &self,
        user_id: &str,
        input: &AnonceInput,
    ) -> Result<AnonceWithAuthor> {
        require_admin(self.db.pool(), user_id, "create anonces").await?;
        validate_title(&input.title)?;
        validate_content(&input.content)?;

        let repo = AnonceRepository::new(self.db.pool());
        let existing = match input.id.as_deref() {
            Some(id) => repo.update(id, &input.title, &input.content).await?,
            None => None,
        };

        let anonce = match existing {
            Some(anonce) => {
                info!(anonce_id = %anonce.id, "Anonce edited");
                anonce
            }
            None => {
                let anonce = repo
                    .create(input.id.as_deref(), &input.title, &input.content, user_id)
                    .await?;
                info!(anonce_id = %anonce.id, "Anonce created");
                anonce
            }
        };

        self.get_by_id(&anonce.id).await
    }

    /// All anonces with authors, newest first.
    pub async fn find_all(&self) -> Result<Vec<AnonceWithAuthor>> {
        AnonceRepository::new(self.db.pool()).list_with_author().await
    }

    /// One anonce with its author.
    pub async fn get_by_id(&self, id: &str) -> Result<AnonceWithAuthor> {
        AnonceRepository::new(self.db.pool())
            .get_with_author(id)
            .await?
            .ok_or_else(|| AnonceError::NotFound("anonce".to_string()))
    }

    /// Record that a user read an anonce. Repeated calls return the first
    /// receipt unchanged.
    pub async fn mark_as_read(&self, user_id: &str, anonce_id: &str) -> Result<ReadRecord> {
        self.ensure_exists(anonce_id).await?;

        let repo = ReadRepository::new(self.db.pool());
        if let Some(existing) = repo.find(user_id, anonce_id).await? {
            return Ok(existing);
        }

        repo.create(user_id, anonce_id).await
    }

    /// Receipts of the calling user with their anonces.
    pub async fn read_by_user(&self, user_id: &str) -> Result<Vec<ReadWithAnonce>> {
        ReadRepository::new(self.db.pool())
            .list_by_user(user_id)
            .await
    }

    /// Who read an anonce. Admin only.
    pub async fn readers(&self, user_id: &str, anonce_id: &str) -> Result<Vec<ReadWithUser>> {
        require_admin(self.db.pool(), user_id, "see readers").await?;
        self.ensure_exists(anonce_id).await?;

        ReadRepository::new(self.db.pool())
            .list_by_anonce(anonce_id)
            .await
    }

    /// Comment on an anonce.
    pub async fn comment(
        &self,
        user_id: &str,
        anonce_id: &str,
        content: &str,
    ) -> Result<CommentWithAuthor> {
        self.ensure_exists(anonce_id).await?;
        validate_comment(content)?;

        let comment = CommentRepository::new(self.db.pool())
            .create(anonce_id, user_id, content)
            .await?;

        info!(comment_id = %comment.id, anonce_id, "Comment added");
        Ok(comment)
    }

    /// An anonce with the comments the caller may see.
    ///
    /// The anonce's author sees every comment; anyone else sees only their
    /// own.
    pub async fn details(&self, user_id: &str, anonce_id: &str) -> Result<AnonceDetails> {
        let anonce = self.get_by_id(anonce_id).await?;

        let filter = if anonce.author_id == user_id {
            None
        } else {
            Some(user_id)
        };
        let comments = CommentRepository::new(self.db.pool())
            .list_by_anonce(anonce_id, filter)
            .await?;

        Ok(AnonceDetails::new(anonce, comments))
    }

    /// Delete an anonce. Admin only.
    pub async fn remove(&self, user_id: &str, anonce_id: &str) -> Result<AnonceWithAuthor> {
        require_admin(self.db.pool(), user_id, "delete anonces").await?;

        let anonce = self.get_by_id(anonce_id).await?;
        AnonceRepository::new(self.db.pool())
            .delete(anonce_id)
            .await?;

        info!(anonce_id, "Anonce deleted");
        Ok(anonce)
    }

    async fn ensure_exists(&self, anonce_id: &str) -> Result<()> {
        AnonceRepository::new(self.db.pool())
            .get_by_id(anonce_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AnonceError::NotFound("anonce".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, Role, UserRepository};

    struct Fixture {
        db: Database,
        admin_id: String,
        jane_id: String,
        john_id: String,
    }

    async fn setup() -> Fixture {
        let db = Database::open_in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());
        let admin = repo
            .create(&NewUser::new("admin@example.com", "h", "Admin").with_role(Role::Admin))
            .await
            .unwrap();
        let jane = repo
            .create(&NewUser::new("jane@example.com", "h", "Jane"))
            .await
            .unwrap();
        let john = repo
            .create(&NewUser::new("john@example.com", "h", "John"))
            .await
            .unwrap();
        Fixture {
            db,
            admin_id: admin.id,
            jane_id: jane.id,
            john_id: john.id,
        }
    }

    async fn publish(f: &Fixture) -> AnonceWithAuthor {
        AnonceService::new(&f.db)
            .create_or_edit(
                &f.admin_id,
                &AnonceInput::new("Meeting", "Monday at ten in room B"),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let f = setup().await;
        let result = AnonceService::new(&f.db)
            .create_or_edit(
                &f.jane_id,
                &AnonceInput::new("Meeting", "Monday at ten in room B"),
            )
            .await;
        assert!(matches!(result, Err(AnonceError::Permission(_))));
    }

    #[tokio::test]
    async fn test_create_validates_lengths() {
        let f = setup().await;
        let service = AnonceService::new(&f.db);

        let short_title = service
            .create_or_edit(&f.admin_id, &AnonceInput::new("Hi", "Monday at ten in room B"))
            .await;
        assert!(matches!(short_title, Err(AnonceError::Validation(_))));

        let short_content = service
            .create_or_edit(&f.admin_id, &AnonceInput::new("Meeting", "Monday"))
            .await;
        assert!(matches!(short_content, Err(AnonceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_or_edit() {
        let f = setup().await;
        let service = AnonceService::new(&f.db);
        let created = publish(&f).await;
        assert_eq!(created.author.name, "Admin");

        let edited = service
            .create_or_edit(
                &f.admin_id,
                &AnonceInput::new("Meeting moved", "Tuesday at ten in room B").with_id(&created.id),
            )
            .await
            .unwrap();
        assert_eq!(edited.id, created.id);
        assert_eq!(edited.title, "Meeting moved");
        assert_eq!(service.find_all().await.unwrap().len(), 1);

        let id = uuid::Uuid::new_v4().to_string();
        let fresh = service
            .create_or_edit(
                &f.admin_id,
                &AnonceInput::new("Party", "Friday at six in the hall").with_id(&id),
            )
            .await
            .unwrap();
        assert_eq!(fresh.id, id);
        assert_eq!(service.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let f = setup().await;
        let result = AnonceService::new(&f.db).get_by_id("missing").await;
        assert!(matches!(result, Err(AnonceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mark_as_read_idempotent() {
        let f = setup().await;
        let service = AnonceService::new(&f.db);
        let anonce = publish(&f).await;

        let first = service.mark_as_read(&f.jane_id, &anonce.id).await.unwrap();
        let second = service.mark_as_read(&f.jane_id, &anonce.id).await.unwrap();
        assert_eq!(first, second);

        let reads = service.read_by_user(&f.jane_id).await.unwrap();
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].anonce.id, anonce.id);

        assert!(matches!(
            service.mark_as_read(&f.jane_id, "missing").await,
            Err(AnonceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_readers_admin_only() {
        let f = setup().await;
        let service = AnonceService::new(&f.db);
        let anonce = publish(&f).await;
        service.mark_as_read(&f.jane_id, &anonce.id).await.unwrap();

        assert!(matches!(
            service.readers(&f.jane_id, &anonce.id).await,
            Err(AnonceError::Permission(_))
        ));

        let readers = service.readers(&f.admin_id, &anonce.id).await.unwrap();
        assert_eq!(readers.len(), 1);
        assert_eq!(readers[0].user.name, "Jane");
    }

    #[tokio::test]
    async fn test_comment_visibility() {
        let f = setup().await;
        let service = AnonceService::new(&f.db);
        let anonce = publish(&f).await;

        service
            .comment(&f.jane_id, &anonce.id, "Jane's question")
            .await
            .unwrap();
        service
            .comment(&f.john_id, &anonce.id, "John's question")
            .await
            .unwrap();

        let author_view = service.details(&f.admin_id, &anonce.id).await.unwrap();
        assert_eq!(author_view.comments.len(), 2);
        assert_eq!(author_view.comments[0].content, "Jane's question");

        let jane_view = service.details(&f.jane_id, &anonce.id).await.unwrap();
        assert_eq!(jane_view.comments.len(), 1);
        assert_eq!(jane_view.comments[0].author.name, "Jane");
    }

    #[tokio::test]
    async fn test_comment_errors() {
        let f = setup().await;
        let service = AnonceService::new(&f.db);
        let anonce = publish(&f).await;

        assert!(matches!(
            service.comment(&f.jane_id, "missing", "Hello").await,
            Err(AnonceError::NotFound(_))
        ));
        assert!(matches!(
            service.comment(&f.jane_id, &anonce.id, "   ").await,
            Err(AnonceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_remove() {
        let f = setup().await;
        let service = AnonceService::new(&f.db);
        let anonce = publish(&f).await;
        service
            .comment(&f.jane_id, &anonce.id, "Jane's question")
            .await
            .unwrap();

        assert!(matches!(
            service.remove(&f.jane_id, &anonce.id).await,
            Err(AnonceError::Permission(_))
        ));

        let removed = service.remove(&f.admin_id, &anonce.id).await.unwrap();
        assert_eq!(removed.id, anonce.id);
        assert!(matches!(
            service.remove(&f.admin_id, &anonce.id).await,
            Err(AnonceError::NotFound(_))
        ));
    }
}
