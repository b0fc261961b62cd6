mod action;
mod app;
mod app_state;
mod component;
mod components;
mod router;
mod theme;
mod widgets;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use holocron_api::{config::Config, platform, ForwardedEntry, ResourceClient};

use crate::router::Route;

#[derive(Parser)]
#[command(name = "holocron", about = "Browse the galaxy's character directory")]
struct Cli {
    /// API root, e.g. http://127.0.0.1:3000/api/ (overrides api.base_url)
    #[arg(long)]
    base_url: Option<String>,
    /// Open the detail view of this character id directly
    #[arg(long, value_name = "ID", conflicts_with = "favourites")]
    character: Option<String>,
    /// Start on the favourites view
    #[arg(long)]
    favourites: bool,
}

impl Cli {
    fn initial_route(&self) -> Route {
        match (&self.character, self.favourites) {
            (Some(id), _) => Route::Detail {
                id: id.clone(),
                forwarded: ForwardedEntry::default(),
            },
            (None, true) => Route::Favourites,
            (None, false) => Route::List,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("holocron log: {}", log_path.display());

    tracing::info!("holocron starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {e:#}");
        Config::default()
    });
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
    }

    let client = Arc::new(ResourceClient::new(&config.api)?);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(
        client,
        Duration::from_millis(config.ui.tick_ms.max(16)),
        cli.initial_route(),
    );
    app.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_flag_opens_blank_detail() {
        let cli = Cli::parse_from(["holocron", "--character", "4"]);
        assert_eq!(
            cli.initial_route(),
            Route::Detail {
                id: "4".into(),
                forwarded: ForwardedEntry::default(),
            }
        );
    }

    #[test]
    fn default_route_is_list() {
        let cli = Cli::parse_from(["holocron", "--base-url", "http://127.0.0.1:3000/api/"]);
        assert_eq!(cli.initial_route(), Route::List);
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:3000/api/"));
        assert!(Cli::try_parse_from(["holocron", "--character", "1", "--favourites"]).is_err());
    }
}
