use anyhow::{Context, Result};
use calsync_core::settings::Settings;
use tracing_subscriber::EnvFilter;

use calsync_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load()?;
    let state = AppState::from_settings(&settings)?;

    let app = calsync_server::app(state);

    let addr = (settings.server.host.as_str(), settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}:{}", addr.0, addr.1))?;

    tracing::info!(address = %listener.local_addr()?, "calsync-server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
