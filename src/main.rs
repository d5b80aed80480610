//! innersense-rs: mood-to-meditation web service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use innersense_rs::api;
use innersense_rs::{Config, MeditationService, SessionStore};

#[derive(Parser, Debug)]
#[command(name = "innersense-rs", about = "Mood-to-meditation web service")]
struct Args {
    /// Path to config YAML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, e.g. 0.0.0.0:8770 (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Session database path (overrides config)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging (suppress noisy hyper/reqwest internals)
    let filter = if args.verbose {
        EnvFilter::new("debug,hyper=info,hyper_util=info,reqwest=info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("innersense-rs starting");

    // Load config, apply CLI overrides
    let mut config = Config::load(args.config.as_deref());
    if let Some(path) = args.database {
        config.database.path = path;
    }
    if config.openai.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; script generation will fail");
    }
    if config.elevenlabs.api_key.is_none() {
        warn!("ELEVENLABS_API_KEY is not set; voice synthesis will fail");
    }

    let store = SessionStore::open(&config.database).context("failed to open session database")?;
    info!("Session store ready at {}", config.database.path.display());

    let service = Arc::new(MeditationService::new(&config, store));
    let state = api::ApiState { service };

    let addr = args.bind.unwrap_or_else(|| config.bind_addr());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, api::router(state))
        .await
        .context("server error")?;

    Ok(())
}
