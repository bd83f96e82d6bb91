//! Server for "Is it worth it in Bangkok?", a directory of honest verdicts on places travelers ask about.
//!
//!
//!
//! # General Infrastructure
//! - Browser asks this server for a page or for search suggestions
//! - Handlers go through the [`catalog`], which is the only code that builds datastore queries
//! - The [`catalog`] hands a [`gateway::Query`] to the configured [`gateway::Gateway`]
//! - In production the gateway is the hosted REST datastore; offline it is a JSON fixture held in memory
//! - Nothing is cached in-process; pages send `Cache-Control` and the host's edge does the rest
//!
//!
//!
//! # Routes
//! - `GET /` top picks, or `?q=` search results
//! - `GET /is-it-worth-it` category directory
//! - `GET /is-it-worth-it/category/{slug}` category listing
//! - `GET /is-it-worth-it/{slug}` verdict page
//! - `GET /api/suggestions?q=` search box suggestions
//! - `GET /sitemap.xml`
//! - `GET /health`
//!
//!
//!
//! # Published Gate
//! Places carry a `published` flag. Unpublished places must never show up anywhere,
//! so the filter lives in exactly one query root inside [`catalog`].
//!
//!
//!
//! # Search Box
//! The search box is modelled in [`widget`] as a state machine that knows nothing about
//! the UI it is rendered in.
//!
//! - Debounce input by 200 ms before asking for suggestions
//! - Queries under 2 characters clear the dropdown without a request
//! - A newer request cancels the one in flight; only the newest result is shown
//!
//!
//!
//! # Setup
//!
//! Point at the hosted datastore.
//! ```sh
//! DATASTORE_URL=https://project.example.co DATASTORE_KEY=anon-key cargo run
//! ```
//!
//! Or run offline against fixtures.
//! ```sh
//! DATASTORE_FIXTURES=fixtures/catalog.json cargo run
//! ```
//!
//! Print the sitemap.
//! ```sh
//! DATASTORE_FIXTURES=fixtures/catalog.json cargo run -- sitemap
//! ```
//!
//! Logs follow `RUST_LOG`.
//! ```sh
//! RUST_LOG=worth_it=debug,tower_http=debug cargo run
//! ```
use anyhow::Error;
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pages;
pub mod routes;
pub mod sitemap;
pub mod state;
pub mod utils;
pub mod widget;

use config::Config;
use routes::router;
use state::State;

pub fn init_tracing() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
}

pub async fn start_server(config: Config) -> Result<(), Error> {
    info!("Initializing state...");
    let state = State::new(config)?;

    info!("Starting server...");

    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            return std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
