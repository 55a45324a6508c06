use crate::errors::{AppError, ResultExt};
use crate::models::{
    CompaniesAndOwnership, CompanyRecord, IndustryQuery, IndustryQueryParams,
    IndustryRequestBody, QueryMode,
};
use crate::pipeline::CompanyRegistry;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Company registry the pipeline reads from.
    pub registry: Arc<dyn CompanyRegistry>,
    /// Bearer key guarding the full-list route (optional).
    pub full_list_api_key: Option<String>,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "company-data-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /v2/companies/sample
///
/// Random sample of up to ten companies of the requested industry, with
/// their persons with significant control.
pub async fn company_sample(
    State(state): State<Arc<AppState>>,
    body: Result<Json<IndustryRequestBody>, JsonRejection>,
) -> Result<Json<CompaniesAndOwnership>, AppError> {
    let query = industry_from_body(body, QueryMode::Sample)?;
    companies_and_ownership(&state, &query).await.map(Json)
}

/// GET /v2/companies/sample?sicDescription=...
///
/// Same as [`company_sample`] with the industry in the query string.
pub async fn company_sample_from_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndustryQueryParams>,
) -> Result<Json<CompaniesAndOwnership>, AppError> {
    let query = IndustryQuery::parse(&params.sic_description, QueryMode::Sample)?;
    companies_and_ownership(&state, &query).await.map(Json)
}

/// POST /v2/companies/authorized/full
///
/// Every eligible company of the industry with their PSCs. Requires the
/// configured bearer key when one is set.
pub async fn company_full_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<IndustryRequestBody>, JsonRejection>,
) -> Result<Json<CompaniesAndOwnership>, AppError> {
    verify_bearer_key(&state, &headers)?;
    let query = industry_from_body(body, QueryMode::Full)?;
    companies_and_ownership(&state, &query).await.map(Json)
}

/// POST /v1/companies/sample
///
/// Companies-only sample, without ownership data.
pub async fn company_sample_without_ownership(
    State(state): State<Arc<AppState>>,
    body: Result<Json<IndustryRequestBody>, JsonRejection>,
) -> Result<Json<Vec<CompanyRecord>>, AppError> {
    let query = industry_from_body(body, QueryMode::Sample)?;
    tracing::info!("Industry requested: {}", query.description);

    let companies = state
        .registry
        .companies_for_industry(&query)
        .await
        .with_context(|| format!("Failed to get company sample for sic {}", query.description))?;

    tracing::info!(
        "returning {} companies for sic \"{}\"",
        companies.len(),
        query.description
    );

    Ok(Json(companies))
}

async fn companies_and_ownership(
    state: &AppState,
    query: &IndustryQuery,
) -> Result<CompaniesAndOwnership, AppError> {
    tracing::info!(
        "Industry requested: {} (mode: {:?})",
        query.description,
        query.mode
    );

    let results = state
        .registry
        .companies_and_ownership_for_industry(query)
        .await
        .with_context(|| format!("Failed to get companies for sic {}", query.description))?;

    tracing::info!(
        "returning {} companies and {} PSCs for sic \"{}\"",
        results.companies.len(),
        results.persons.len(),
        query.description
    );

    Ok(results)
}

fn industry_from_body(
    body: Result<Json<IndustryRequestBody>, JsonRejection>,
    mode: QueryMode,
) -> Result<IndustryQuery, AppError> {
    let Json(body) = body.map_err(|rejection| match rejection {
        // Body limit and stream errors keep their own status (413, 400, ...)
        JsonRejection::BytesRejection(_) => AppError::UnreadableBody {
            status: rejection.status(),
            message: rejection.body_text(),
        },
        _ => AppError::BadRequest(format!(
            "error parsing request body: {}",
            rejection.body_text()
        )),
    })?;

    IndustryQuery::parse(&body.sic_description, mode)
}

/// Checks the `Authorization: Bearer <key>` header against the configured key.
fn verify_bearer_key(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(ref expected_key) = state.full_list_api_key else {
        return Ok(());
    };

    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("No bearer token given".to_string()))?;

    if !constant_time_compare(token, expected_key) {
        return Err(AppError::Unauthorized("Invalid bearer token".to_string()));
    }

    Ok(())
}

/// Constant-time string comparison (basic implementation)
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes().iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
