use anyhow::{Context, Result};
use clap::Parser;
use speakcheck::config::Config;
use speakcheck::db::Store;
use speakcheck::http::{create_router, AppState};
use speakcheck::storage::StorageClient;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "speakcheck", about = "Spoken-language assessment API server")]
struct Opts {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/speakcheck")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let cfg = Config::load(&opts.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let mongo = mongodb::Client::with_uri_str(&cfg.database.uri)
        .await
        .context("Failed to initialize MongoDB client")?;
    let db = mongo.database(&cfg.database.name);

    info!("Using database {}", cfg.database.name);

    let store = Store::new(&db);
    let storage = StorageClient::new(&cfg.storage);
    let state = AppState::new(store, storage);

    let router = create_router(state, &cfg.cors.allowed_origins)?;

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server exited")?;

    Ok(())
}
