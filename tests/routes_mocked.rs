/// Route tests with a mocked registry
/// Drives the full router without a database: validation, authorization,
/// response shape and error mapping
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use company_data_api::errors::PipelineError;
use company_data_api::handlers::AppState;
use company_data_api::models::{
    CompaniesAndOwnership, CompanyRecord, IndustryQuery, PersonRecord, QueryMode,
};
use company_data_api::pipeline::CompanyRegistry;
use company_data_api::routes::app_router;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Registry returning canned data and recording the queries it received.
#[derive(Default)]
struct MockRegistry {
    fail: bool,
    queries: Mutex<Vec<IndustryQuery>>,
}

impl MockRegistry {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn recorded(&self) -> Vec<IndustryQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, query: &IndustryQuery) -> Result<(), PipelineError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(PipelineError::UnknownAccountCategory {
                company_number: "01234567".to_string(),
                category: "SEMI-DETACHED".to_string(),
            });
        }
        Ok(())
    }
}

fn company(number: &str) -> CompanyRecord {
    CompanyRecord {
        name: format!("SALT COMPANY {}", number),
        company_number: number.to_string(),
        companies_house_url: format!(
            "https://find-and-update.company-information.service.gov.uk/company/{}",
            number
        ),
        address: "1 Brine Street, NORTHWICH, CW9 7TX".to_string(),
        size: "small".to_string(),
        incorporation_date: "12/03/1998".to_string(),
        mortgage_charges: 0,
        mortgages_outstanding: 0,
        mortgages_part_satisfied: 0,
        mortgages_satisfied: 0,
        last_accounts_date: "31/12/2022".to_string(),
        next_accounts_date: "30/09/2024".to_string(),
    }
}

#[async_trait]
impl CompanyRegistry for MockRegistry {
    async fn companies_for_industry(
        &self,
        query: &IndustryQuery,
    ) -> Result<Vec<CompanyRecord>, PipelineError> {
        self.record(query)?;
        Ok(vec![company("00000001"), company("00000002")])
    }

    async fn companies_and_ownership_for_industry(
        &self,
        query: &IndustryQuery,
    ) -> Result<CompaniesAndOwnership, PipelineError> {
        self.record(query)?;
        Ok(CompaniesAndOwnership {
            companies: vec![company("00000001")],
            persons: vec![PersonRecord {
                company_number: "00000001".to_string(),
                name: "Jane Doe".to_string(),
                address: "Northwich, England".to_string(),
                nationality: "British".to_string(),
                notified_on: "2016-04-06".to_string(),
                person_type: "individual".to_string(),
                nature_of_control: None,
                age: Some(43),
            }],
        })
    }
}

fn router(registry: Arc<MockRegistry>, key: Option<&str>) -> Router {
    let state = Arc::new(AppState {
        registry,
        full_list_api_key: key.map(str::to_string),
    });
    app_router(state, false).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let app = router(Arc::new(MockRegistry::default()), None);
    let request = Request::get("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_sample_returns_companies_and_pscs() {
    let registry = Arc::new(MockRegistry::default());
    let app = router(registry.clone(), None);

    let (status, body) = send(
        app,
        json_request(
            "/v2/companies/sample",
            r#"{"SicDescription": "Extraction of salt"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["companies"][0]["companyNumber"], "00000001");
    assert_eq!(body["companies"][0]["size"], "small");
    assert_eq!(
        body["personsWithSignificantControl"][0]["companyNumber"],
        "00000001"
    );
    assert_eq!(body["personsWithSignificantControl"][0]["age"], 43);
    assert_eq!(
        registry.recorded(),
        vec![IndustryQuery::new("Extraction of salt", true)]
    );
}

#[tokio::test]
async fn test_sample_from_query_string() {
    let registry = Arc::new(MockRegistry::default());
    let app = router(registry.clone(), None);
    let request = Request::get("/v2/companies/sample?sicDescription=Extraction%20of%20salt")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(registry.recorded()[0].description, "Extraction of salt");
}

#[tokio::test]
async fn test_empty_industry_is_bad_request() {
    let registry = Arc::new(MockRegistry::default());
    let app = router(registry.clone(), None);

    let (status, body) = send(
        app,
        json_request("/v2/companies/sample", r#"{"SicDescription": ""}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid industry"));
    assert!(registry.recorded().is_empty());
}

#[tokio::test]
async fn test_missing_industry_is_bad_request() {
    let app = router(Arc::new(MockRegistry::default()), None);
    let (status, _) = send(app, json_request("/v2/companies/sample", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_over_long_industry_is_bad_request() {
    let registry = Arc::new(MockRegistry::default());
    let app = router(registry.clone(), None);
    let body = serde_json::json!({ "SicDescription": "x".repeat(201) }).to_string();

    let (status, _) = send(app, json_request("/v2/companies/sample", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(registry.recorded().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = router(Arc::new(MockRegistry::default()), None);
    let (status, body) = send(app, json_request("/v2/companies/sample", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("error parsing request body"));
}

#[tokio::test]
async fn test_oversized_streamed_body_is_payload_too_large() {
    let registry = Arc::new(MockRegistry::default());
    let app = router(registry.clone(), None);
    // No Content-Length header, so the limit trips while the body is read
    let body = serde_json::json!({ "SicDescription": "x".repeat(70 * 1024) }).to_string();

    let (status, _) = send(app, json_request("/v2/companies/sample", &body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(registry.recorded().is_empty());
}

#[tokio::test]
async fn test_pipeline_failure_is_internal_error() {
    let app = router(Arc::new(MockRegistry::failing()), None);

    let (status, body) = send(
        app,
        json_request(
            "/v2/companies/sample",
            r#"{"SicDescription": "Extraction of salt"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_companies_only_sample() {
    let registry = Arc::new(MockRegistry::default());
    let app = router(registry.clone(), None);

    let (status, body) = send(
        app,
        json_request(
            "/v1/companies/sample",
            r#"{"sicDescription": "Extraction of salt"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(registry.recorded()[0].mode, QueryMode::Sample);
}

#[tokio::test]
async fn test_full_list_requires_bearer_key() {
    let registry = Arc::new(MockRegistry::default());
    let app = router(registry.clone(), Some("full-list-key"));

    let (status, _) = send(
        app,
        json_request(
            "/v2/companies/authorized/full",
            r#"{"SicDescription": "Extraction of salt"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(registry.recorded().is_empty());
}

#[tokio::test]
async fn test_full_list_rejects_wrong_key() {
    let app = router(Arc::new(MockRegistry::default()), Some("full-list-key"));
    let mut request = json_request(
        "/v2/companies/authorized/full",
        r#"{"SicDescription": "Extraction of salt"}"#,
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer not-the-key".parse().unwrap(),
    );

    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_full_list_with_key_uses_full_mode() {
    let registry = Arc::new(MockRegistry::default());
    let app = router(registry.clone(), Some("full-list-key"));
    let mut request = json_request(
        "/v2/companies/authorized/full",
        r#"{"SicDescription": "Extraction of salt"}"#,
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        "Bearer full-list-key".parse().unwrap(),
    );

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["companies"].as_array().unwrap().len(), 1);
    assert_eq!(
        registry.recorded(),
        vec![IndustryQuery::new("Extraction of salt", false)]
    );
}
