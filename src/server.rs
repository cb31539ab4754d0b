use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    artifacts::ArtifactStore,
    config::{Config, SiteConfig},
    handlers::{self, locations::LOCATIONS_ENDPOINT, predict::PREDICT_ENDPOINT, AppState},
    metrics,
    signals::setup_signal_handlers,
    static_files::attach_site,
};

/// Request bodies above this size are rejected
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Start the estimator server
///
/// This function:
/// 1. Initializes metrics (when enabled)
/// 2. Sets up signal handlers for graceful shutdown and artifact reload
/// 3. Creates the Axum application
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
///
/// Artifacts must already be loaded into `store`.
pub async fn start_server(config: Config, store: Arc<ArtifactStore>) -> Result<()> {
    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    // SIGTERM, SIGINT for shutdown; SIGHUP for artifact reload
    let (shutdown_tx, signal_handle) = setup_signal_handlers(store.clone())?;
    let mut shutdown_rx = shutdown_tx.subscribe();

    let estimator = store.current();
    let paths = store.paths();
    let app = create_router(AppState::new(store), &config.site, metrics_handle);

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid server.host '{}'", config.server.host))?,
        config.server.port,
    ));

    info!("Starting home price estimator on {}", addr);
    info!(
        columns = %paths.columns.display(),
        model = %paths.model.display(),
        locations = estimator.locations().len(),
        site = %config.site.dir.display(),
        "Serving artifacts"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    state: AppState,
    site: &SiteConfig,
    metrics_handle: Option<Arc<PrometheusHandle>>,
) -> Router {
    let api_routes = Router::new()
        .route(LOCATIONS_ENDPOINT, get(handlers::locations::get_location_names))
        .route(
            PREDICT_ENDPOINT,
            get(handlers::predict::predict_home_price).post(handlers::predict::predict_home_price),
        )
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(state);

    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(handlers::metrics_handler::metrics))
                .with_state(handle),
        );
    }

    // The site claims `/` and every path no route above matches
    attach_site(router, site)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
