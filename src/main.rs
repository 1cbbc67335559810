use std::sync::Arc;

use fix_my_lane::api::map_service::{self, DirectionsProvider};
use fix_my_lane::api::service::AppState;
use fix_my_lane::config::{Config, REQUIRED_VARIABLES};
use fix_my_lane::db::Database;
use fix_my_lane::graph::{GraphStore, MemoryStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("{e}");
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::env().inspect_err(|e| {
        log::error!(
            "config: {e}. Check all required environment variables ({}) are set.",
            REQUIRED_VARIABLES.join(", ")
        );
    })?;

    config.log();

    let directions: Option<Arc<dyn DirectionsProvider>> = match &config.ors_api_key {
        Some(key) => {
            let client = map_service::Client::new(&config.ors_url, key, &config.ors_profile)?;
            log::info!("Using directions service ({})", config.ors_url);
            Some(Arc::new(client))
        }
        None => None,
    };

    match &config.pg_url {
        Some(pg_url) => {
            let database = Database::connect(pg_url).await?;
            log::info!("Connected to database");

            database.init_schema().await?;
            log::info!("Successfully ran init query");

            serve(&config, database, directions).await
        }
        None => {
            log::warn!("PG_URL not set, keeping the graph in memory; it is lost on exit");
            serve(&config, MemoryStore::new(), directions).await
        }
    }
}

async fn serve<S: GraphStore>(
    config: &Config,
    store: S,
    directions: Option<Arc<dyn DirectionsProvider>>,
) -> anyhow::Result<()> {
    let state = AppState::new(store, directions, &config.api_key);

    let listen_addr = format!("0.0.0.0:{}", config.listen_port);
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;

    let router = fix_my_lane::api::service::router::router(state);

    log::info!("Listening on {listen_addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
