//! keygate - bearer token authentication service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keygate::{
    auth::{InMemoryUserDirectory, KeyStore, TokenClass, TokenService, UserDirectory},
    config::{Args, LogFormat},
    server, AuthError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("keygate={},info", args.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    match args.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  keygate {}", env!("CARGO_PKG_VERSION"));
    info!("  commit {} built {}", env!("GIT_COMMIT_SHORT"), env!("BUILD_TIMESTAMP"));
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Algorithm: {}", args.tokens.jwt_algorithm);
    info!("Issuer: {}", args.tokens.jwt_issuer);
    info!(
        "Access keys: {} / {}",
        args.tokens.access_private_key_path.display(),
        args.tokens.access_public_key_path.display()
    );
    info!(
        "Refresh keys: {} / {}",
        args.tokens.refresh_private_key_path.display(),
        args.tokens.refresh_public_key_path.display()
    );
    info!(
        "Lifetimes: access {}m, refresh {}d",
        args.tokens.access_expiration_minutes, args.tokens.refresh_expiration_days
    );
    info!("======================================");

    let config = Arc::new(exit_if_fatal(
        args.tokens.token_config(),
        "Invalid token configuration",
    )?);

    // Key material must load before anything is served
    let keys = Arc::new(exit_if_fatal(
        KeyStore::load(&config).map_err(AuthError::from),
        "Failed to load signing keys",
    )?);
    for class in TokenClass::ALL {
        info!("{} key pair: RSA {} bits", class, keys.pair(class).bits());
    }

    let directory: Arc<dyn UserDirectory> = match &args.users_file {
        Some(path) => Arc::new(exit_if_fatal(
            InMemoryUserDirectory::from_json_file(path),
            "Failed to load users file",
        )?),
        None => {
            warn!("USERS_FILE not set, user directory is empty");
            Arc::new(InMemoryUserDirectory::new())
        }
    };

    let tokens = TokenService::with_system_clock(keys, config);
    let state = Arc::new(server::AppState::new(tokens, directory));

    server::run(state, args.listen).await?;

    Ok(())
}

/// Startup errors the process cannot recover from end it here
fn exit_if_fatal<T>(result: Result<T, AuthError>, context: &str) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_fatal() => {
            error!("{}: {}", context, e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
