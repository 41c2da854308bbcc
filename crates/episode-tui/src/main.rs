mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use episode_proto::config::Config;
use episode_tui::mpv::spawn_player;
use episode_tui::DisplaySurface;

use crate::app::App;
use crate::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = episode_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("tui.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("episodes log: {}", log_path.display());
    tracing::info!("episodes starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config: {}, using defaults", e);
        Config::default()
    });
    let source = config.catalog.resolve();

    // ── Player ───────────────────────────────────────────────────────────────
    let (sink, player_task) = spawn_player(config.mpv.clone());

    let state = AppState::new(DisplaySurface::new(sink.clone()), source.to_string());
    let result = App::new(state, source).run().await;

    sink.shutdown();
    let _ = player_task.await;
    tracing::info!("episodes exiting");

    result
}
