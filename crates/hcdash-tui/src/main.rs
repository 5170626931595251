//! `hcdash`: terminal dashboard for a Home Connect bridge.
//!
//! Two screens, navigable with `1`/`2` or Tab: **Appliances** (run API
//! actions and raw GET/PUT calls against an appliance) and **Requests**
//! (the captured traffic log plus a request-count histogram per bridge).
//!
//! Logs are written to a file (default `/tmp/hcdash.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod dialogs;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use hcdash_config::{Defaults, Profile};
use hcdash_core::TrafficLog;

use crate::app::{App, AppContext};

/// Terminal dashboard for a Home Connect bridge.
#[derive(Parser, Debug)]
#[command(name = "hcdash", version, about)]
struct Cli {
    /// Bridge backend URL (e.g., http://openhab.local:8080/homeconnect)
    #[arg(short = 'b', long, env = "HCDASH_BACKEND")]
    backend: Option<String>,

    /// Config profile to use (defaults to the file's default profile)
    #[arg(short = 'p', long, env = "HCDASH_PROFILE")]
    profile: Option<String>,

    /// Captured traffic log (JSON array of request records)
    #[arg(short = 't', long)]
    traffic_log: Option<PathBuf>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Log file path (defaults to /tmp/hcdash.log)
    #[arg(long, default_value = "/tmp/hcdash.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may go to stdout/stderr while the TUI owns
/// the terminal. Hold the guard for the lifetime of the app.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hcdash={log_level},hcdash_core={log_level},hcdash_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("hcdash.log"));

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

/// Resolve the profile to run with. CLI flags override the config file;
/// a bare `--backend` works without any file at all.
fn resolve_profile(cli: &Cli) -> Result<(String, Profile, Defaults)> {
    let config_path = hcdash_config::config_path();
    let cfg = hcdash_config::load_config_from(&config_path)
        .wrap_err_with(|| format!("reading config {}", config_path.display()))?;
    let defaults = cfg.defaults.clone();

    let (name, mut profile) = match cfg.profile(cli.profile.as_deref()) {
        Ok((name, profile)) => (name, profile.clone()),
        Err(e) if cli.profile.is_some() => return Err(e.into()),
        Err(_) => ("cli".to_owned(), Profile::for_backend(String::new())),
    };

    if let Some(backend) = &cli.backend {
        profile.backend.clone_from(backend);
    }
    if cli.insecure {
        profile.insecure = Some(true);
    }
    if let Some(path) = &cli.traffic_log {
        profile.traffic_log = Some(path.clone());
    }

    if profile.backend.is_empty() {
        return Err(eyre!(
            "no backend configured: pass --backend, set HCDASH_BACKEND, or add a profile to {}",
            config_path.display()
        ));
    }
    Ok((name, profile, defaults))
}

fn load_traffic_log(profile: &Profile) -> Result<TrafficLog> {
    match &profile.traffic_log {
        Some(path) => TrafficLog::load(path)
            .wrap_err_with(|| format!("loading traffic log {}", path.display())),
        None => {
            warn!("no traffic log configured, request list will be empty");
            Ok(TrafficLog::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first so a panic during init still restores the terminal
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let (profile_name, profile, defaults) = resolve_profile(&cli)?;
    let dashboard = hcdash_config::profile_to_dashboard_config(&profile, &defaults)?;
    let client = dashboard.connect()?;
    let traffic = load_traffic_log(&profile)?;

    info!(
        profile = %profile_name,
        backend = %dashboard.url,
        records = traffic.len(),
        "starting hcdash"
    );

    let ctx = AppContext {
        backend: Arc::new(client),
        traffic: Arc::new(traffic),
        profile,
        backend_label: dashboard.url.to_string(),
        bin_size_ms: dashboard.bin_size_ms,
    };
    let mut app = App::new(ctx);
    app.run().await?;

    Ok(())
}
