//! Database schema and migrations for Anonce.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded. The schema_version table tracks which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    password    TEXT NOT NULL,           -- Argon2 hash
    role        TEXT NOT NULL DEFAULT 'USER',  -- 'ADMIN', 'USER'
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: anonces, comments and read receipts
    r#"
CREATE TABLE anonces (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    author_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_anonces_author_id ON anonces(author_id);
CREATE INDEX idx_anonces_created_at ON anonces(created_at);

CREATE TABLE comments (
    id          TEXT PRIMARY KEY,
    content     TEXT NOT NULL,
    anonce_id   TEXT NOT NULL REFERENCES anonces(id) ON DELETE CASCADE,
    author_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_comments_anonce_id ON comments(anonce_id);

CREATE TABLE reads (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    anonce_id   TEXT NOT NULL REFERENCES anonces(id) ON DELETE CASCADE,
    read_at     TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, anonce_id)
);

CREATE INDEX idx_reads_anonce_id ON reads(anonce_id);
"#,
    // v3: votes, candidates and ballots
    r#"
CREATE TABLE votes (
    id              TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL DEFAULT '',
    active          INTEGER NOT NULL DEFAULT 0,
    created_by_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_votes_active ON votes(active);

CREATE TABLE candidates (
    id          TEXT PRIMARY KEY,
    vote_id     TEXT NOT NULL REFERENCES votes(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);

CREATE INDEX idx_candidates_vote_id ON candidates(vote_id);

CREATE TABLE vote_records (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    vote_id         TEXT NOT NULL REFERENCES votes(id) ON DELETE CASCADE,
    candidate_id    TEXT NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
    created_at      TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, vote_id)
);

CREATE INDEX idx_vote_records_vote_id ON vote_records(vote_id);
CREATE INDEX idx_vote_records_candidate_id ON vote_records(candidate_id);
"#,
];
