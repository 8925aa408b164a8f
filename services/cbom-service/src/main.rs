use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    serve, Router,
};
use matchwise_utils::{init_logging, AppConfig, CbomPipeline, DictionaryLoader};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

mod handlers;
mod metrics;
mod middleware;
mod routes;

use handlers::{health_check, metrics_handler};
use metrics::ServiceMetrics;
use middleware::request_id_middleware;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Matchwise CBOM service");

    let app = create_app(&config)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("CBOM service listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

/// Build the router. Fails when the CBOM layout or any pattern in `config`
/// is unusable.
pub fn create_app(config: &AppConfig) -> Result<Router> {
    let pipeline = CbomPipeline::new(config)?;
    let dictionary = DictionaryLoader::new(&config.dictionary)?;
    let metrics = ServiceMetrics::new()?;

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", routes::create_api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(config.server.max_request_size))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
        .with_state(AppState {
            config: Arc::new(config.clone()),
            pipeline: Arc::new(pipeline),
            dictionary: Arc::new(dictionary),
            metrics: Arc::new(metrics),
        });

    Ok(app)
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<CbomPipeline>,
    pub dictionary: Arc<DictionaryLoader>,
    pub metrics: Arc<ServiceMetrics>,
}
