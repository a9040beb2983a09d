use tracing::{error, info};

use anonce::logging::{self, Service};
use anonce::{Config, Database, UserService, WebServer};

/// Config file path: first argument, or `config.toml`.
fn config_path() -> String {
    std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string())
}

#[tokio::main]
async fn main() {
    let path = config_path();
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

    logging::init_or_console(&config.logging, Service::Gateway);

    info!("Anonce gateway");

    if let Err(e) = run(config).await {
        error!("Gateway stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anonce::Result<()> {
    config.validate()?;

    let db = Database::open(&config.database.path).await?;
    info!("Database opened at {}", config.database.path);

    UserService::new(&db).bootstrap_admin(&config.admin).await?;

    info!("Voting service expected at {}", config.voting.addr());
    WebServer::new(&config, db)?.run().await
}
