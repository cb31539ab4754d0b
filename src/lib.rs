pub mod artifacts;
pub mod config;
pub mod error;
pub mod estimator;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod schema;
pub mod server;
pub mod signals;
pub mod static_files;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over `default_level`. `format` is "json" or "text".
///
/// Note: This function can only be called once.
pub fn init_tracing(default_level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry
            .with(fmt::layer().json().with_target(true))
            .init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
