//! Board module for Anonce.
//!
//! This module provides the announcement board:
//! - Anonces published and edited by admins
//! - Comments, visible to the anonce author and to their own writer
//! - Read receipts, one per user and anonce

mod comment_repository;
mod read_repository;
mod repository;
mod service;
mod types;

pub use comment_repository::CommentRepository;
pub use read_repository::ReadRepository;
pub use repository::AnonceRepository;
pub use service::{
    AnonceService, MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH, MIN_CONTENT_LENGTH, MIN_TITLE_LENGTH,
};
pub use types::{
    Anonce, AnonceDetails, AnonceInput, AnonceWithAuthor, CommentWithAuthor, ReadRecord,
    ReadWithAnonce, ReadWithUser,
};
