//! Pokedex - in-memory creature catalog over HTTP

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use pokedex::{
    config::Args,
    logging,
    server::{self, AppState},
    store::{self, RecordStore},
    PokedexError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init_tracing(&args.log_level, args.log_format);

    if let Err(e) = args.validate().map_err(PokedexError::Config) {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Pokedex API v{}", env!("CARGO_PKG_VERSION"));
    info!("======================================");
    info!("Listen: {}", args.listen_addr());
    match args.seed_file {
        Some(ref path) => info!("Seed: {}", path.display()),
        None => info!("Seed: bundled"),
    }
    if let Some(ref path) = args.access_log {
        info!("Access log: {}", path.display());
    }
    info!("======================================");

    let records = match store::load_seed(args.seed_file.as_deref()) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to load seed data: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(args, RecordStore::with_records(records));
    if let Err(e) = state.init_access_log().await {
        error!("Failed to open access log: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = server::run(Arc::new(state)).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
