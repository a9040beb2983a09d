//! HTTP gateway for Anonce.
//!
//! REST API for accounts and anonces, with vote routes forwarded to the
//! voting service.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use middleware::JwtState;
pub use router::{create_health_router, create_router, create_swagger_router};
pub use server::WebServer;
