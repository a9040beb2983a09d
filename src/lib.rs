//! Anonce - announcement board with a voting microservice
//!
//! An HTTP gateway for accounts, anonces and comments, plus a voting service
//! reached over a newline-delimited JSON RPC transport.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod rpc;
pub mod vote;
pub mod web;

pub use auth::{
    hash_password, validate_password, verify_password, PasswordError, Signup, UserService,
};
pub use board::AnonceService;
pub use config::Config;
pub use db::{Database, NewUser, Role, User, UserRepository};
pub use error::{AnonceError, Result};
pub use rpc::{RpcServer, VoteClient};
pub use vote::VoteService;
pub use web::WebServer;
