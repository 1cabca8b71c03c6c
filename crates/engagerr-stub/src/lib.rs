//! Engagerr Stub Backend
//!
//! In-memory implementation of the content relationship REST API.
//! Used for local development and as the counterpart in SDK integration tests.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod store;

use config::StubConfig;
use handlers::{create_router, AppState};
use store::{ContentStore, Seed};
use tokio::net::TcpListener;
use tracing::info;

/// Stub backend error
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Seed file could not be loaded
    #[error("Failed to load seed file: {0}")]
    Seed(std::io::Error),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build application state from configuration, loading the seed file if set
pub fn build_state(config: &StubConfig) -> Result<AppState, StubError> {
    let store = match &config.seed_file {
        Some(path) => {
            let seed = Seed::from_file(path).map_err(StubError::Seed)?;
            info!(
                "Loaded seed: {} content items, {} relationships, {} suggestions",
                seed.contents.len(),
                seed.relationships.len(),
                seed.suggestions.len()
            );
            ContentStore::from_seed(seed)
        }
        None => ContentStore::new(),
    };
    Ok(AppState::new(store))
}

/// Serve the API on an already-bound listener until the server stops
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), StubError> {
    let app = create_router(state);

    axum::serve(listener, app)
        .await
        .map_err(|e| StubError::Server(e.to_string()))
}

/// Start the stub HTTP server
///
/// Loads seed data, binds the configured address and serves until the
/// process is stopped.
pub async fn start_server(config: StubConfig) -> Result<(), StubError> {
    info!("Starting Engagerr stub backend");
    info!("Bind address: {}", config.bind_addr());

    let state = build_state(&config)?;

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Stub backend listening on {}", config.bind_addr());

    serve(listener, state).await
}
