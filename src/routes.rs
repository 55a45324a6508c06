//! HTTP route definitions

use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Request bodies only carry an industry description.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Company lookup routes.
pub fn company_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/v2/companies/sample",
            post(handlers::company_sample).get(handlers::company_sample_from_query),
        )
        .route(
            "/v2/companies/authorized/full",
            post(handlers::company_full_list),
        )
        .route(
            "/v1/companies/sample",
            post(handlers::company_sample_without_ownership),
        )
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
}

/// Full application router.
///
/// With `rate_limited`, company routes allow 10 requests/second per client
/// IP with a burst of 20. The health check is never rate limited.
pub fn app_router(state: Arc<AppState>, rate_limited: bool) -> anyhow::Result<Router> {
    let mut companies = company_routes();

    if rate_limited {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(10)
                .burst_size(20)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?,
        );

        companies = companies.layer(ServiceBuilder::new().layer(GovernorLayer {
            config: governor_conf,
        }));
    }

    Ok(Router::new()
        .route("/health", get(handlers::health))
        .merge(companies)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
