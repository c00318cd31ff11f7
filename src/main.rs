//! Lingora · English-Learning Platform Backend
//!
//! - Axum HTTP API: teacher availability scheduling + curriculum export
//! - Optional object-storage uploads (via environment variables)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                 : u16 (default 3000)
//!   STORAGE_BASE_URL     : enables object-storage uploads if present
//!   STORAGE_API_KEY      : bearer key for the object store
//!   STORAGE_BUCKET       : default "exports"
//!   PLATFORM_CONFIG_PATH : path to TOML config (export defaults + lesson bank)
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use lingora_backend::routes::build_router;
use lingora_backend::state::AppState;
use lingora_backend::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (lesson bank, slot store, object store).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "lingora_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
