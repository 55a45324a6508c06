use company_data_api::config::Config;
use company_data_api::db::RegistryDatabase;
use company_data_api::handlers::AppState;
use company_data_api::pipeline::EnrichmentPipeline;
use company_data_api::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, wires the enrichment pipeline
/// into the HTTP routes and starts the Axum server. No database connection is
/// opened here: each request opens and closes its own.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "company_data_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pipeline = EnrichmentPipeline::new(RegistryDatabase::new(config.database.clone()));
    let app_state = Arc::new(AppState {
        registry: Arc::new(pipeline),
        full_list_api_key: config.full_list_api_key.clone(),
    });

    let app = routes::app_router(app_state, true)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Client addresses feed the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
