//! MyVoice Studio server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use myvoice_core::config::AppConfig;
use myvoice_server::{AppState, create_router};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MyVoice Studio - singing demo catalog and player backend
#[derive(Parser, Debug)]
#[command(name = "myvoiced")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "MYVOICE_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("MyVoice Studio v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration: optional TOML file, overridden by MYVOICE_* env
    // vars. Every setting has a default, so running bare is fine for demos.
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();

    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("MYVOICE_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    if config.owner.uses_default_password() {
        tracing::warn!(
            "Owner password is the built-in default; set MYVOICE_OWNER__PASSWORD before exposing this server"
        );
    }
    if config.coach.api_key.is_none() {
        tracing::warn!(
            "No completion API key configured; /api/analyze and /api/voice-report will fail (set MYVOICE_COACH__API_KEY)"
        );
    }

    // Initialize storage backend and verify connectivity before accepting
    // requests, so configuration errors surface at startup.
    let storage = myvoice_storage::from_config(&config.storage)
        .await
        .context("failed to initialize storage")?;
    storage
        .health_check()
        .await
        .context("storage health check failed")?;
    tracing::info!(backend = storage.backend_name(), "Storage backend ready");

    let bind = config.server.bind.clone();
    let state = AppState::new(config, storage);
    let app = create_router(state);

    let addr: SocketAddr = bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
