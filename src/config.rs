//! Configuration module for Anonce.
//!
//! Both binaries read the same `config.toml`; each uses the sections it needs.

use serde::Deserialize;
use std::path::Path;

use crate::{AnonceError, Result};

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Mark the auth cookie `Secure` (set in production behind TLS).
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            secure_cookies: false,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/anonce.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (must be set).
    #[serde(default)]
    pub secret: String,
    /// Access token lifetime in seconds. Also used as the cookie max-age.
    #[serde(default = "default_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_token_expiry() -> u64 {
    86400 // 1 day
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiry_secs: default_token_expiry(),
        }
    }
}

/// Voting microservice configuration.
///
/// The gateway connects to `host:port`; the `voting` binary listens there.
#[derive(Debug, Clone, Deserialize)]
pub struct VotingConfig {
    /// Host of the voting service.
    #[serde(default = "default_voting_host")]
    pub host: String,
    /// Port of the voting service.
    #[serde(default = "default_voting_port")]
    pub port: u16,
    /// Maximum concurrent RPC connections accepted by the voting service.
    #[serde(default = "default_voting_max_connections")]
    pub max_connections: usize,
    /// Timeout for a single request/reply exchange, in seconds.
    #[serde(default = "default_voting_timeout")]
    pub request_timeout_secs: u64,
}

fn default_voting_host() -> String {
    "127.0.0.1".to_string()
}

fn default_voting_port() -> u16 {
    3001
}

fn default_voting_max_connections() -> usize {
    64
}

fn default_voting_timeout() -> u64 {
    5
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            host: default_voting_host(),
            port: default_voting_port(),
            max_connections: default_voting_max_connections(),
            request_timeout_secs: default_voting_timeout(),
        }
    }
}

impl VotingConfig {
    /// Address string of the voting service.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Initial administrator account.
///
/// Created on gateway startup when both email and password are set and no
/// account with that email exists yet.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Administrator email.
    #[serde(default)]
    pub email: String,
    /// Administrator password (plain text, hashed on creation).
    #[serde(default)]
    pub password: String,
    /// Administrator display name.
    #[serde(default = "default_admin_name")]
    pub name: String,
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            name: default_admin_name(),
        }
    }
}

impl AdminConfig {
    /// Whether a bootstrap account is configured.
    pub fn is_configured(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/anonce.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP gateway configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JWT configuration.
    #[serde(default)]
    pub jwt: JwtConfig,
    /// Voting service configuration.
    #[serde(default)]
    pub voting: VotingConfig,
    /// Bootstrap administrator.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(AnonceError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AnonceError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ANONCE_JWT_SECRET`: Override the JWT secret key
    /// - `ANONCE_DATABASE_PATH`: Override the database path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("ANONCE_JWT_SECRET") {
            if !secret.is_empty() {
                self.jwt.secret = secret;
            }
        }
        if let Ok(path) = std::env::var("ANONCE_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// The gateway refuses to start without a JWT secret.
    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.is_empty() {
            return Err(AnonceError::Config(
                "jwt.secret is not set. \
                 Set it in config.toml or via ANONCE_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.voting.max_connections == 0 {
            return Err(AnonceError::Config(
                "voting.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
