use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Settings;
use crate::data::source::SIMULATED_LATENCY;
use crate::data::{CharacterRepository, MockCharacterSource, RepositoryConfig};

pub mod api;
pub mod routes;

pub use routes::{router, AppState};

/// Wire the repository against the mock source described by `settings`.
pub fn build_state(settings: Settings) -> AppState {
    let config = settings.repository_config();
    let source = Arc::new(mock_source(&config));
    let repository = Arc::new(CharacterRepository::new(source, config));
    AppState::new(repository, settings)
}

fn mock_source(config: &RepositoryConfig) -> MockCharacterSource {
    MockCharacterSource::new(config.base_url.clone(), SIMULATED_LATENCY)
}

pub async fn run_server(settings: Settings) -> std::io::Result<()> {
    let bind_addr = settings.bind_addr();
    let state = build_state(settings);
    let repository = Arc::clone(&state.repository);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        app = %state.settings.app_name,
        version = %state.settings.app_version,
        "server listening"
    );

    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    repository.close().await;
    tracing::info!("server stopped");
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
