//! Vote service: guarded operations behind the voting message patterns.

use tracing::{info, warn};

use super::repository::VoteRepository;
use super::types::{
    CandidateName, CandidateResult, CastVoteRequest, CreateVoteRequest, Vote, VoteData,
    VoteListItem, VoteRecord, VoteWithCandidates, Voter,
};
use crate::auth::permission::require_admin;
use crate::db::{Database, UserRepository, UserSummary};
use crate::{verify_password, AnonceError, Result};

/// Message reported for a repeated ballot.
pub const ALREADY_VOTED: &str = "You have already voted";

/// Service for vote operations with permission checking.
pub struct VoteService<'a> {
    db: &'a Database,
}

impl<'a> VoteService<'a> {
    /// Create a new VoteService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an inactive vote with its candidates. Admin only.
    pub async fn create_vote(
        &self,
        user_id: &str,
        request: &CreateVoteRequest,
    ) -> Result<VoteWithCandidates> {
        require_admin(self.db.pool(), user_id, "create votes").await?;

        if request.title.trim().is_empty() {
            return Err(AnonceError::Validation("Title must not be empty".to_string()));
        }
        if request.candidates.is_empty() {
            return Err(AnonceError::Validation(
                "At least one candidate is required".to_string(),
            ));
        }
        if request.candidates.iter().any(|c| c.name.trim().is_empty()) {
            return Err(AnonceError::Validation(
                "Candidate name must not be empty".to_string(),
            ));
        }

        let repo = VoteRepository::new(self.db.pool());
        let mut tx = repo.begin().await?;
        let vote =
            VoteRepository::insert_vote(&mut tx, &request.title, &request.description, user_id)
                .await?;
        let mut candidates = Vec::with_capacity(request.candidates.len());
        for input in &request.candidates {
            candidates.push(VoteRepository::insert_candidate(&mut tx, &vote.id, input).await?);
        }
        tx.commit().await?;

        info!(vote_id = %vote.id, candidates = candidates.len(), "Vote created");
        Ok(VoteWithCandidates::new(vote, candidates))
    }

    /// List votes visible to a user.
    ///
    /// Admins see every vote. Other users see only votes whose active flag
    /// equals `is_active`.
    pub async fn find_all(&self, user_id: &str, is_active: bool) -> Result<Vec<VoteListItem>> {
        let user = UserRepository::new(self.db.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AnonceError::Permission("User not found".to_string()))?;

        let repo = VoteRepository::new(self.db.pool());
        let filter = if user.is_admin() { None } else { Some(is_active) };
        let votes = repo.list(filter).await?;

        let mut items = Vec::with_capacity(votes.len());
        for vote in votes {
            let created_by = repo
                .creator(&vote.created_by_id)
                .await?
                .ok_or_else(|| AnonceError::NotFound("user".to_string()))?;
            let candidates = repo.candidates(&vote.id).await?;
            let user_vote = repo.find_record(user_id, &vote.id).await?;

            items.push(VoteListItem {
                vote_data: VoteData {
                    id: vote.id,
                    title: vote.title,
                    description: vote.description,
                    active: vote.active,
                    created_by_id: vote.created_by_id,
                    created_at: vote.created_at,
                    created_by,
                    candidates,
                },
                user_vote,
            });
        }

        Ok(items)
    }

    /// Cast a ballot.
    ///
    /// Checks run in order: user exists, password matches, vote exists, vote
    /// is open, no prior ballot, candidate belongs to the vote.
    pub async fn cast_vote(&self, user_id: &str, request: &CastVoteRequest) -> Result<VoteRecord> {
        let user = UserRepository::new(self.db.pool())
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AnonceError::NotFound("user".to_string()))?;

        if verify_password(&request.password, &user.password).is_err() {
            warn!(user_id = %user.id, "Ballot rejected: invalid password");
            return Err(AnonceError::Auth("Invalid password".to_string()));
        }

        let repo = VoteRepository::new(self.db.pool());
        let vote = self.get_vote(&request.vote_id).await?;
        if !vote.active {
            return Err(AnonceError::Conflict("The vote is closed".to_string()));
        }

        if repo.find_record(user_id, &vote.id).await?.is_some() {
            return Err(AnonceError::Conflict(ALREADY_VOTED.to_string()));
        }

        match repo.get_candidate(&request.candidate_id).await? {
            Some(candidate) if candidate.vote_id == vote.id => {}
            _ => {
                return Err(AnonceError::Validation(
                    "Invalid candidate for this vote".to_string(),
                ))
            }
        }

        let record = self
            .record_ballot(user_id, &vote.id, &request.candidate_id)
            .await?;

        info!(vote_id = %vote.id, user_id = %user_id, "Ballot recorded");
        Ok(record)
    }

    /// Insert the ballot row. A unique-index hit means a concurrent ballot
    /// from the same user won after the pre-check.
    async fn record_ballot(
        &self,
        user_id: &str,
        vote_id: &str,
        candidate_id: &str,
    ) -> Result<VoteRecord> {
        VoteRepository::new(self.db.pool())
            .insert_record(user_id, vote_id, candidate_id)
            .await
            .map_err(|e| match e {
                AnonceError::Conflict(_) => AnonceError::Conflict(ALREADY_VOTED.to_string()),
                other => other,
            })
    }

    /// Ballot counts per candidate.
    pub async fn results(&self, vote_id: &str) -> Result<Vec<CandidateResult>> {
        self.get_vote(vote_id).await?;
        VoteRepository::new(self.db.pool()).results(vote_id).await
    }

    /// Ballots with voter identity and chosen candidate name.
    pub async fn voters(&self, vote_id: &str) -> Result<Vec<Voter>> {
        self.get_vote(vote_id).await?;
        let rows = VoteRepository::new(self.db.pool()).voters(vote_id).await?;

        Ok(rows
            .into_iter()
            .map(|row| Voter {
                user: UserSummary {
                    id: row.user_id.clone(),
                    name: row.user_name,
                    email: row.user_email,
                },
                candidate: CandidateName {
                    name: row.candidate_name,
                },
                id: row.id,
                user_id: row.user_id,
                vote_id: row.vote_id,
                candidate_id: row.candidate_id,
                created_at: row.created_at,
            })
            .collect())
    }

    /// Open or close a vote. Admin only.
    pub async fn set_active(&self, user_id: &str, vote_id: &str, is_active: bool) -> Result<Vote> {
        require_admin(self.db.pool(), user_id, "change vote status").await?;

        let vote = VoteRepository::new(self.db.pool())
            .set_active(vote_id, is_active)
            .await?
            .ok_or_else(|| AnonceError::NotFound("vote".to_string()))?;

        info!(vote_id = %vote.id, active = is_active, "Vote status changed");
        Ok(vote)
    }

    /// Delete a vote with its candidates and ballots. Admin only.
    pub async fn remove(&self, user_id: &str, vote_id: &str) -> Result<Vote> {
        require_admin(self.db.pool(), user_id, "delete votes").await?;

        let vote = self.get_vote(vote_id).await?;
        VoteRepository::new(self.db.pool()).delete(vote_id).await?;

        info!(vote_id = %vote.id, "Vote deleted");
        Ok(vote)
    }

    async fn get_vote(&self, vote_id: &str) -> Result<Vote> {
        VoteRepository::new(self.db.pool())
            .get_by_id(vote_id)
            .await?
            .ok_or_else(|| AnonceError::NotFound("vote".to_string()))
    }
}
