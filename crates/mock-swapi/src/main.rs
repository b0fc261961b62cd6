use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    let state = mock_swapi::MockState::new(format!("http://{addr}/api/"));
    // Simulated network delay, handy for watching loading states in the UI.
    if let Some(ms) = std::env::var("LATENCY_MS").ok().and_then(|v| v.parse().ok()) {
        state.set_latency(Duration::from_millis(ms));
        info!(ms, "latency enabled");
    }

    info!("listening on http://{addr}/api/");
    axum::serve(listener, mock_swapi::app(state)).await?;
    Ok(())
}
