//! Voting microservice: answers `vote.*` message patterns over TCP.

use tracing::{error, info};

use anonce::logging::{self, Service};
use anonce::{Config, Database, RpcServer};

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = match Config::load_with_env(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    logging::init_or_console(&config.logging, Service::Voting);

    info!("Anonce voting service");

    if let Err(e) = run(config).await {
        error!("Voting service stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anonce::Result<()> {
    let db = Database::open(&config.database.path).await?;
    info!("Database opened at {}", config.database.path);

    let server = RpcServer::bind(&config.voting, db).await?;
    server.run().await
}

