//! Process-level tracing bootstrap.

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber: formatted output, `RUST_LOG`
/// filtering (default `info`), and span traces attached to errors.
///
/// Loads `.env` first so filter directives can live there. Later calls are
/// no-ops, which keeps it safe for tests that race to initialize.
pub fn init_tracing() {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(ErrorLayer::default())
        .try_init();
}
