//! # Tour Desk Register Daemon
//!
//! Headless entry point: loads configuration, opens the database, runs the
//! closing watcher and logs every status change until Ctrl-C.
//!
//! ## Usage
//! ```bash
//! cargo run -p tourdesk-register
//!
//! # Explicit config file
//! cargo run -p tourdesk-register -- --config ./register.toml
//! ```
//!
//! A UI shell links the library instead and calls the commands directly.

use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

use tourdesk_register::config::RegisterConfig;
use tourdesk_register::watcher::ClosingWatcher;
use tourdesk_register::{bootstrap, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tour Desk Register");
                println!();
                println!("Usage: tourdesk-register [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                println!();
                println!("Environment:");
                println!("  TOURDESK_DB_PATH, TOURDESK_STORE_NAME, TOURDESK_CLOSING_HOUR,");
                println!("  TOURDESK_POLL_SECS, TOURDESK_TIMEZONE, TOURDESK_SESSION_TOKEN");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    init_tracing();
    info!("Starting Tour Desk register");

    let config = RegisterConfig::load_or_default(config_path);
    let state = bootstrap(&config).await?;

    if let Ok(token) = env::var("TOURDESK_SESSION_TOKEN") {
        state.session.sign_in(token);
    }

    let (watcher, handle) = ClosingWatcher::new(&state);
    let task = tokio::spawn(watcher.run());

    let mut status_rx = handle.subscribe();
    let reporter = tokio::spawn(async move {
        while status_rx.changed().await.is_ok() {
            let status = status_rx.borrow_and_update().clone();
            if let Some(status) = status {
                match serde_json::to_string(&status) {
                    Ok(json) => info!(status = %json, "Closing status"),
                    Err(e) => warn!(%e, "Could not serialize closing status"),
                }
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    handle.shutdown().await?;
    task.await?;
    reporter.abort();

    if let Some(db) = state.db.inner() {
        db.close().await;
    }

    info!("Tour Desk register stopped");
    Ok(())
}
