//! `maspatas-tui`: terminal dashboard for the MasPatas store backend.
//!
//! Built on [ratatui](https://ratatui.rs) over the reactive state of
//! `maspatas-core`'s [`Dashboard`]. Screens are navigable via number keys
//! (1-4): Dashboard, Products, Clients and Sales.
//!
//! Logs go to a file (default `<cache dir>/maspatas-tui.log`) so they never
//! corrupt the terminal. A background data bridge forwards every dashboard
//! state change into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod form;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use maspatas_config::Config;
use maspatas_core::Dashboard;

use crate::app::App;

/// Terminal dashboard for MasPatas products, clients, inventory and sales.
#[derive(Parser, Debug)]
#[command(name = "maspatas-tui", version, about)]
struct Cli {
    /// API base URL, absolute or relative to the configured origin
    #[arg(short = 'u', long, env = "MASPATAS_API_URL")]
    api_url: Option<String>,

    /// Config file to read instead of the platform default
    #[arg(long, env = "MASPATAS_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file path (defaults to <cache dir>/maspatas-tui.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may be written to stdout or stderr while the
/// terminal is in raw mode. The returned guard flushes the log on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "maspatas_tui={log_level},maspatas_core={log_level},maspatas_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| maspatas_config::cache_dir().join("maspatas-tui.log"));
    let log_dir = log_file.parent().unwrap_or(Path::new("."));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("maspatas-tui.log"));

    // A missing cache dir must not stop the UI; the appender reports its
    // own write failures.
    let _ = std::fs::create_dir_all(log_dir);

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Shared config file plus environment, with `--api-url` on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(maspatas_config::config_path);
    let mut cfg = maspatas_config::load_config_from(&path)?;
    if let Some(ref url) = cli.api_url {
        cfg.api_url.clone_from(url);
    }
    Ok(cfg)
}

fn build_dashboard(cfg: &Config) -> Result<Dashboard> {
    let dashboard_config = cfg.dashboard_config()?;
    let credentials = cfg.credential_store()?;
    Ok(Dashboard::new(&dashboard_config, credentials)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in BEFORE the terminal switches to raw mode
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let cfg = load_config(&cli)?;
    let dashboard = build_dashboard(&cfg)?;

    info!(
        api_url = %dashboard.api().base_url(),
        authenticated = dashboard.is_authenticated(),
        "starting maspatas-tui"
    );

    let mut app = App::new(dashboard, cfg.username);
    app.run().await?;

    Ok(())
}
