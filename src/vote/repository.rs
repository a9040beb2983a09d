//! Vote repository for the voting service.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use super::types::{Candidate, CandidateInput, CandidateResult, Vote, VoteRecord};
use crate::db::UserSummary;
use crate::{AnonceError, Result};

const VOTE_COLUMNS: &str = "id, title, description, active, created_by_id, created_at";
const CANDIDATE_COLUMNS: &str = "id, vote_id, name, description";
const RECORD_COLUMNS: &str = "id, user_id, vote_id, candidate_id, created_at";

/// Repository for votes, candidates and ballots.
pub struct VoteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VoteRepository<'a> {
    /// Create a new VoteRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Begin a transaction on the underlying pool.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Insert an inactive vote inside a transaction.
    pub async fn insert_vote(
        conn: &mut SqliteConnection,
        title: &str,
        description: &str,
        created_by_id: &str,
    ) -> Result<Vote> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO votes (id, title, description, active, created_by_id) VALUES ($1, $2, $3, 0, $4)",
        )
        .bind(&id)
        .bind(title)
        .bind(description)
        .bind(created_by_id)
        .execute(&mut *conn)
        .await?;

        let sql = format!("SELECT {VOTE_COLUMNS} FROM votes WHERE id = $1");
        let row = sqlx::query_as::<_, VoteRow>(&sql)
            .bind(&id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AnonceError::NotFound("vote".to_string()))?;

        Ok(row.into_vote())
    }

    /// Insert a candidate inside a transaction.
    pub async fn insert_candidate(
        conn: &mut SqliteConnection,
        vote_id: &str,
        input: &CandidateInput,
    ) -> Result<Candidate> {
        let candidate = Candidate {
            id: uuid::Uuid::new_v4().to_string(),
            vote_id: vote_id.to_string(),
            name: input.name.clone(),
            description: input.description.clone(),
        };
        sqlx::query("INSERT INTO candidates (id, vote_id, name, description) VALUES ($1, $2, $3, $4)")
            .bind(&candidate.id)
            .bind(&candidate.vote_id)
            .bind(&candidate.name)
            .bind(&candidate.description)
            .execute(&mut *conn)
            .await?;

        Ok(candidate)
    }

    /// Get a vote by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Vote>> {
        let sql = format!("SELECT {VOTE_COLUMNS} FROM votes WHERE id = $1");
        let row = sqlx::query_as::<_, VoteRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(VoteRow::into_vote))
    }

    /// List votes newest first, optionally filtered by active state.
    pub async fn list(&self, active: Option<bool>) -> Result<Vec<Vote>> {
        let rows = match active {
            Some(active) => {
                let sql = format!(
                    "SELECT {VOTE_COLUMNS} FROM votes WHERE active = $1 ORDER BY created_at DESC, rowid DESC"
                );
                sqlx::query_as::<_, VoteRow>(&sql)
                    .bind(active)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql =
                    format!("SELECT {VOTE_COLUMNS} FROM votes ORDER BY created_at DESC, rowid DESC");
                sqlx::query_as::<_, VoteRow>(&sql)
                    .fetch_all(self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(VoteRow::into_vote).collect())
    }

    /// Set the active flag. Returns the updated vote, or None if not found.
    pub async fn set_active(&self, id: &str, active: bool) -> Result<Option<Vote>> {
        let result = sqlx::query("UPDATE votes SET active = $1 WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a vote. Candidates and ballots cascade.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM votes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Candidates of a vote in creation order.
    pub async fn candidates(&self, vote_id: &str) -> Result<Vec<Candidate>> {
        let sql =
            format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE vote_id = $1 ORDER BY rowid");
        let candidates = sqlx::query_as::<_, Candidate>(&sql)
            .bind(vote_id)
            .fetch_all(self.pool)
            .await?;
        Ok(candidates)
    }

    /// Get a candidate by ID.
    pub async fn get_candidate(&self, id: &str) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1");
        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(candidate)
    }

    /// The ballot a user cast on a vote, if any.
    pub async fn find_record(&self, user_id: &str, vote_id: &str) -> Result<Option<VoteRecord>> {
        let sql =
            format!("SELECT {RECORD_COLUMNS} FROM vote_records WHERE user_id = $1 AND vote_id = $2");
        let record = sqlx::query_as::<_, VoteRecord>(&sql)
            .bind(user_id)
            .bind(vote_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(record)
    }

    /// Insert a ballot.
    ///
    /// A second ballot for the same (user, vote) fails with a conflict.
    pub async fn insert_record(
        &self,
        user_id: &str,
        vote_id: &str,
        candidate_id: &str,
    ) -> Result<VoteRecord> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO vote_records (id, user_id, vote_id, candidate_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(vote_id)
        .bind(candidate_id)
        .execute(self.pool)
        .await?;

        let sql = format!("SELECT {RECORD_COLUMNS} FROM vote_records WHERE id = $1");
        let record = sqlx::query_as::<_, VoteRecord>(&sql)
            .bind(&id)
            .fetch_one(self.pool)
            .await?;
        Ok(record)
    }

    /// Ballot counts per candidate, including candidates with no ballots.
    pub async fn results(&self, vote_id: &str) -> Result<Vec<CandidateResult>> {
        let results = sqlx::query_as::<_, CandidateResult>(
            r#"
            SELECT c.id, c.name, COUNT(r.id) AS count
            FROM candidates c
            LEFT JOIN vote_records r ON r.candidate_id = c.id
            WHERE c.vote_id = $1
            GROUP BY c.id, c.name
            ORDER BY c.rowid
            "#,
        )
        .bind(vote_id)
        .fetch_all(self.pool)
        .await?;
        Ok(results)
    }

    /// Ballots on a vote joined with voter and candidate, oldest first.
    pub async fn voters(&self, vote_id: &str) -> Result<Vec<VoterRow>> {
        let rows = sqlx::query_as::<_, VoterRow>(
            r#"
            SELECT r.id, r.user_id, r.vote_id, r.candidate_id, r.created_at,
                   u.name AS user_name, u.email AS user_email,
                   c.name AS candidate_name
            FROM vote_records r
            JOIN users u ON u.id = r.user_id
            JOIN candidates c ON c.id = r.candidate_id
            WHERE r.vote_id = $1
            ORDER BY r.created_at, r.rowid
            "#,
        )
        .bind(vote_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Identity of a vote's creator.
    pub async fn creator(&self, user_id: &str) -> Result<Option<UserSummary>> {
        let creator = sqlx::query_as::<_, UserSummary>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(creator)
    }
}

/// Internal struct for mapping database rows to Vote.
#[derive(sqlx::FromRow)]
struct VoteRow {
    id: String,
    title: String,
    description: String,
    active: bool,
    created_by_id: String,
    created_at: String,
}

impl VoteRow {
    fn into_vote(self) -> Vote {
        Vote {
            id: self.id,
            title: self.title,
            description: self.description,
            active: self.active,
            created_by_id: self.created_by_id,
            created_at: self.created_at,
        }
    }
}

/// Ballot joined with voter and candidate names.
#[derive(Debug, sqlx::FromRow)]
pub struct VoterRow {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) vote_id: String,
    pub(crate) candidate_id: String,
    pub(crate) created_at: String,
    pub(crate) user_name: String,
    pub(crate) user_email: String,
    pub(crate) candidate_name: String,
}
