//! Taskline server -- flat-file task list over HTTP.
//!
//! Serves a JSON CRUD API under `/api/todos` plus a static front-end,
//! persisting tasks to a pipe-delimited text file.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:3000 with ./data.txt
//! cargo run --bin taskline-server
//!
//! # Custom bind address and data file
//! cargo run --bin taskline-server -- --bind 127.0.0.1:8080 --data-file tasks.txt
//!
//! # Or via environment variable
//! TASKLINE_ADDR=127.0.0.1:8080 cargo run --bin taskline-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskline_server::api::AppState;
use taskline_server::config::{CliArgs, ServerConfig};
use taskline_server::server;
use taskline_server::static_files::StaticFiles;
use taskline_server::store::TaskStore;

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        addr = %config.bind_addr,
        data_file = %config.data_file.display(),
        "starting taskline server"
    );

    let state = AppState {
        store: Arc::new(TaskStore::flat_file(&config.data_file)),
        statics: Arc::new(StaticFiles::new(
            &config.static_root,
            config.default_document.clone(),
        )),
    };

    match server::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
