//! # API REST
//!
//! REST API implementation for the triage service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Mapping core errors onto status codes and `{ error }` bodies
//!
//! Uses `api-shared` for DTOs and `triage-core` for everything else.

#![warn(rust_2018_idioms)]

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    query::parse_comma_separated_list, CatalogRes, CategoriesParams, DayScheduleDto, ErrorRes,
    FacilityDto, FacilityListRes, FacilityRes, HealthRes, HealthService, QuestionnaireReq,
    RecommendReq, RecommendRes, SearchParams, SummaryRes, TimeRangeDto, TriageRes,
};
use triage_core::{
    catalog::parse_tags,
    config::{resolve_facility_data_file, triage_rules_from_env_value},
    error::parse_json_slice,
    CoreConfig, Department, FacilityStore, InMemoryFacilityStore, Location, Questionnaire,
    SearchCriteria, Symptom, TriageError, TriageResult, TriageService,
};
use uuid::Uuid;

/// The service as handlers see it; the store behind it is chosen at startup.
pub type SharedService = TriageService<dyn FacilityStore>;

type ApiError = (StatusCode, Json<ErrorRes>);

/// Application state for the REST API server
#[derive(Clone)]
pub struct AppState {
    service: SharedService,
}

impl AppState {
    pub fn new(service: SharedService) -> Self {
        Self { service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        catalog,
        list_facilities,
        get_facility,
        search,
        search_by_categories,
        recommend_departments,
        summarise_symptoms,
        triage,
    ),
    components(schemas(
        HealthRes,
        CatalogRes,
        TimeRangeDto,
        DayScheduleDto,
        FacilityDto,
        FacilityListRes,
        FacilityRes,
        RecommendReq,
        RecommendRes,
        QuestionnaireReq,
        SummaryRes,
        TriageRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Read `FACILITY_DATA_FILE` and `TRIAGE_RULES_FILE` once and resolve the core configuration.
pub fn core_config_from_env() -> anyhow::Result<CoreConfig> {
    let data_override = std::env::var("FACILITY_DATA_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let facility_data_file = resolve_facility_data_file(data_override)?;
    let rules = triage_rules_from_env_value(std::env::var("TRIAGE_RULES_FILE").ok())?;

    Ok(CoreConfig::new(facility_data_file, Arc::new(rules))?)
}

/// Load the facility store named by `cfg` and wrap it in a service.
pub fn service_from_config(cfg: &CoreConfig) -> TriageResult<SharedService> {
    let store: Arc<dyn FacilityStore> =
        Arc::new(InMemoryFacilityStore::from_yaml_file(cfg.facility_data_file())?);
    Ok(TriageService::new(store, cfg.triage_rules()))
}

/// Build the full router, Swagger UI included.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(catalog))
        .route("/facilities", get(list_facilities))
        .route("/facilities/search", get(search_by_categories))
        .route("/facilities/:id", get(get_facility))
        .route("/search", get(search))
        .route("/departments", post(recommend_departments))
        .route("/symptoms/summary", post(summarise_symptoms))
        .route("/triage", post(triage))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(service))
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorRes::new(message)))
}

/// Map a core error onto a status and body. Dependency details stay in the log.
fn error_response(err: TriageError) -> ApiError {
    error_with(err, "search failed")
}

/// As [`error_response`], answering server-side failures with `failure`.
fn error_with(err: TriageError, failure: &'static str) -> ApiError {
    match err {
        TriageError::Validation(errors) => {
            tracing::warn!("rejected questionnaire: {} problem(s)", errors.len());
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorRes::from_validation(&errors)),
            )
        }
        TriageError::Malformed(e) => {
            tracing::warn!("malformed request: {}", e);
            bad_request(e.to_string())
        }
        TriageError::UnknownTag(e) => {
            tracing::warn!("unknown tag: {}", e);
            bad_request(e.to_string())
        }
        TriageError::InvalidInput(message) => bad_request(message),
        // Already logged by the service.
        TriageError::Dependency(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorRes::new(failure)),
        ),
        other => {
            tracing::error!("request failed: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes::new(failure)),
            )
        }
    }
}

fn parse_questionnaire(body: &[u8]) -> Result<Questionnaire, ApiError> {
    Questionnaire::from_json_slice(body).map_err(|e| error_response(e.into()))
}

fn parse_departments(value: Option<&str>) -> Result<Vec<Department>, ApiError> {
    parse_tags(&parse_comma_separated_list(value)).map_err(|e| error_response(e.into()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Every closed tag list", body = CatalogRes)
    )
)]
async fn catalog() -> Json<CatalogRes> {
    Json(CatalogRes::current())
}

#[utoipa::path(
    get,
    path = "/facilities",
    responses(
        (status = 200, description = "All facilities in name order", body = FacilityListRes),
        (status = 500, description = "Facility store failure", body = ErrorRes)
    )
)]
/// List every facility.
#[axum::debug_handler]
async fn list_facilities(
    State(state): State<AppState>,
) -> Result<Json<FacilityListRes>, ApiError> {
    let facilities = state.service.list_facilities().map_err(error_response)?;
    Ok(Json(FacilityListRes::from(facilities.as_slice())))
}

#[utoipa::path(
    get,
    path = "/facilities/{id}",
    params(
        ("id" = String, Path, description = "Facility UUID")
    ),
    responses(
        (status = 200, description = "The facility", body = FacilityRes),
        (status = 400, description = "Invalid facility id", body = ErrorRes),
        (status = 404, description = "Unknown facility", body = ErrorRes),
        (status = 500, description = "Facility store failure", body = ErrorRes)
    )
)]
/// Fetch one facility by id.
#[axum::debug_handler]
async fn get_facility(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FacilityRes>, ApiError> {
    let id = match Uuid::parse_str(id.trim()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("invalid facility id {:?}: {}", id, e);
            return Err(bad_request("invalid facility id"));
        }
    };

    match state
        .service
        .get_facility(id)
        .map_err(|e| error_with(e, "lookup failed"))?
    {
        Some(facility) => Ok(Json(FacilityRes {
            hospital: FacilityDto::from(&facility),
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorRes::new("facility not found")),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching facilities, ranked when categories are given", body = FacilityListRes),
        (status = 400, description = "Unknown department", body = ErrorRes),
        (status = 500, description = "Facility store failure", body = ErrorRes)
    )
)]
/// Search by departments, cities and a name keyword. Every filter is optional.
#[axum::debug_handler]
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<FacilityListRes>, ApiError> {
    let criteria = SearchCriteria {
        departments: parse_departments(params.categories.as_deref())?,
        cities: parse_comma_separated_list(params.cities.as_deref()),
        keyword: params.keyword,
    };

    let facilities = state.service.search(&criteria).map_err(error_response)?;
    Ok(Json(FacilityListRes::from(facilities.as_slice())))
}

#[utoipa::path(
    get,
    path = "/facilities/search",
    params(CategoriesParams),
    responses(
        (status = 200, description = "Facilities ranked by department match", body = FacilityListRes),
        (status = 400, description = "Missing or unknown departments", body = ErrorRes),
        (status = 500, description = "Facility store failure", body = ErrorRes)
    )
)]
/// Ranked search over recommended departments. At least one department is required.
#[axum::debug_handler]
async fn search_by_categories(
    State(state): State<AppState>,
    Query(params): Query<CategoriesParams>,
) -> Result<Json<FacilityListRes>, ApiError> {
    let departments = parse_departments(params.categories.as_deref())?;
    if departments.is_empty() {
        tracing::warn!("ranked search without categories");
        return Err(bad_request("categories are required"));
    }

    let facilities = state
        .service
        .search(&SearchCriteria::for_departments(departments))
        .map_err(error_response)?;
    Ok(Json(FacilityListRes::from(facilities.as_slice())))
}

#[utoipa::path(
    post,
    path = "/departments",
    request_body = RecommendReq,
    responses(
        (status = 200, description = "Recommended departments, highest priority first", body = RecommendRes),
        (status = 400, description = "Malformed body or unknown tag", body = ErrorRes)
    )
)]
/// Recommend departments for body locations and symptoms.
#[axum::debug_handler]
async fn recommend_departments(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RecommendRes>, ApiError> {
    let req: RecommendReq = parse_json_slice(&body).map_err(|e| error_response(e.into()))?;
    let locations: Vec<Location> = parse_tags(&req.locations).map_err(|e| error_response(e.into()))?;
    let symptoms: Vec<Symptom> = parse_tags(&req.symptoms).map_err(|e| error_response(e.into()))?;

    let departments = state.service.recommend(&locations, &symptoms);
    Ok(Json(RecommendRes::from(departments.as_slice())))
}

#[utoipa::path(
    post,
    path = "/symptoms/summary",
    request_body = QuestionnaireReq,
    responses(
        (status = 200, description = "Clinician-facing summary", body = SummaryRes),
        (status = 400, description = "Malformed or incomplete questionnaire", body = ErrorRes)
    )
)]
/// Render the text summary for a completed questionnaire.
#[axum::debug_handler]
async fn summarise_symptoms(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SummaryRes>, ApiError> {
    let questionnaire = parse_questionnaire(&body)?;
    let description = state
        .service
        .describe(&questionnaire)
        .map_err(error_response)?;
    Ok(Json(SummaryRes { description }))
}

#[utoipa::path(
    post,
    path = "/triage",
    request_body = QuestionnaireReq,
    responses(
        (status = 200, description = "Departments, summary and ranked facilities", body = TriageRes),
        (status = 400, description = "Malformed or incomplete questionnaire", body = ErrorRes),
        (status = 500, description = "Facility store failure", body = ErrorRes)
    )
)]
/// Full intake: recommend departments, describe, and search in one call.
#[axum::debug_handler]
async fn triage(State(state): State<AppState>, body: Bytes) -> Result<Json<TriageRes>, ApiError> {
    let questionnaire = parse_questionnaire(&body)?;
    let assessment = state.service.assess(&questionnaire).map_err(error_response)?;
    tracing::info!(
        "triage recommended {} department(s), {} facilities",
        assessment.departments.len(),
        assessment.facilities.len()
    );
    Ok(Json(TriageRes::from(&assessment)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use triage_core::facility::parse_facilities_yaml;
    use triage_core::{DependencyError, Facility, FacilityQuery};

    const DATA: &str = r#"
- id: 9e4b7a00-0000-4000-8000-000000000001
  name: City ENT Clinic
  departments: [ENT]
  city: Central
  address: 1 Market Street
  phone: "100"
- id: 9e4b7a00-0000-4000-8000-000000000002
  name: Central General Hospital
  departments: [internal medicine, ENT, cardiology]
  city: Central
  address: 2 Market Street
  phone: "200"
- id: 9e4b7a00-0000-4000-8000-000000000003
  name: Suburb Skin Clinic
  departments: [dermatology]
  city: Suburb
  address: 3 Park Road
  phone: "300"
"#;

    const COMPLETE: &str = r#"{
        "locations": ["throat"],
        "duration": "today",
        "symptoms": ["fever"],
        "conditions": ["none"],
        "medicine": "not taking"
    }"#;

    fn app() -> Router {
        let store: Arc<dyn FacilityStore> = Arc::new(InMemoryFacilityStore::new(
            parse_facilities_yaml(DATA).expect("parse"),
        ));
        router(TriageService::with_builtin_rules(store))
    }

    struct FailingStore;

    impl FacilityStore for FailingStore {
        fn find_facilities(&self, _: &FacilityQuery) -> Result<Vec<Facility>, DependencyError> {
            Err(DependencyError::new("database unreachable at 10.0.0.5"))
        }

        fn get_facility(&self, _: Uuid) -> Result<Option<Facility>, DependencyError> {
            Err(DependencyError::new("database unreachable at 10.0.0.5"))
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).expect("json body");
        (status, json)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn post_req(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn hospital_names(json: &serde_json::Value) -> Vec<String> {
        json["hospitals"]
            .as_array()
            .expect("hospitals array")
            .iter()
            .map(|h| h["name"].as_str().expect("name").to_string())
            .collect()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, json) = send(app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn catalog_lists_tags() {
        let (status, json) = send(app(), get_req("/catalog")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["locations"][0], "throat");
        assert!(json["lumpSizes"].as_array().expect("array").len() == 3);
    }

    #[tokio::test]
    async fn lists_facilities_in_name_order() {
        let (status, json) = send(app(), get_req("/facilities")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 3);
        assert_eq!(
            hospital_names(&json),
            ["Central General Hospital", "City ENT Clinic", "Suburb Skin Clinic"]
        );
    }

    #[tokio::test]
    async fn gets_one_facility() {
        let (status, json) = send(
            app(),
            get_req("/facilities/9e4b7a00-0000-4000-8000-000000000003"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["hospital"]["name"], "Suburb Skin Clinic");

        let (status, _) = send(
            app(),
            get_req("/facilities/9e4b7a00-0000-4000-8000-0000000000ff"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, json) = send(app(), get_req("/facilities/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid facility id");
    }

    #[tokio::test]
    async fn search_ranks_by_department_match() {
        let (status, json) = send(
            app(),
            get_req("/search?categories=ENT,internal%20medicine&cities=Central"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 2);
        assert_eq!(
            hospital_names(&json),
            ["Central General Hospital", "City ENT Clinic"]
        );
    }

    #[tokio::test]
    async fn search_by_keyword_only() {
        let (status, json) = send(app(), get_req("/search?keyword=clinic")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hospital_names(&json), ["City ENT Clinic", "Suburb Skin Clinic"]);
    }

    #[tokio::test]
    async fn search_rejects_unknown_department() {
        let (status, json) = send(app(), get_req("/search?categories=podiatry")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().expect("error").contains("podiatry"));
    }

    #[tokio::test]
    async fn ranked_search_requires_categories() {
        let (status, json) = send(app(), get_req("/facilities/search")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "categories are required");

        let (status, json) = send(app(), get_req("/facilities/search?categories=ENT")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            hospital_names(&json),
            ["Central General Hospital", "City ENT Clinic"]
        );
    }

    #[tokio::test]
    async fn recommends_departments() {
        let (status, json) = send(
            app(),
            post_req(
                "/departments",
                r#"{"locations": ["throat"], "symptoms": ["fever"]}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["departments"],
            serde_json::json!(["internal medicine", "ENT"])
        );

        let (status, _) = send(
            app(),
            post_req("/departments", r#"{"locations": ["elbow"], "symptoms": []}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn recommend_without_symptoms_uses_the_location_table() {
        let (status, json) = send(
            app(),
            post_req("/departments", r#"{"locations": ["throat"]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["departments"],
            serde_json::json!(["ENT", "internal medicine"])
        );
    }

    #[tokio::test]
    async fn malformed_recommend_request_names_the_field() {
        let (status, json) = send(
            app(),
            post_req("/departments", r#"{"locations": "throat"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = json["error"].as_str().expect("error message");
        assert!(error.starts_with("malformed input at locations:"), "{error}");
    }

    #[tokio::test]
    async fn summary_for_complete_questionnaire() {
        let (status, json) = send(app(), post_req("/symptoms/summary", COMPLETE)).await;
        assert_eq!(status, StatusCode::OK);
        let description = json["description"].as_str().expect("description");
        assert!(description.starts_with("[Symptoms]"));
    }

    #[tokio::test]
    async fn summary_reports_every_validation_error() {
        let (status, json) = send(
            app(),
            post_req("/symptoms/summary", r#"{"locations": ["throat"]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = json["errors"].as_array().expect("errors");
        assert_eq!(errors.len(), 4);
        assert_eq!(json["error"], errors[0]);
    }

    #[tokio::test]
    async fn malformed_questionnaire_is_a_bad_request() {
        let (status, json) = send(app(), post_req("/symptoms/summary", "[1, 2, 3]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("errors").is_none());
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn triage_returns_departments_summary_and_facilities() {
        let (status, json) = send(app(), post_req("/triage", COMPLETE)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["departments"][0], "internal medicine");
        assert_eq!(json["count"], 2);
        assert_eq!(hospital_names(&json)[0], "Central General Hospital");
    }

    #[tokio::test]
    async fn store_failure_is_opaque() {
        let store: Arc<dyn FacilityStore> = Arc::new(FailingStore);
        let app = router(TriageService::with_builtin_rules(store));
        let (status, json) = send(app, get_req("/search?categories=ENT")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({ "error": "search failed" }));
    }

    #[tokio::test]
    async fn lookup_store_failure_is_opaque() {
        let store: Arc<dyn FacilityStore> = Arc::new(FailingStore);
        let app = router(TriageService::with_builtin_rules(store));
        let (status, json) = send(
            app,
            get_req("/facilities/9e4b7a00-0000-4000-8000-000000000001"),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({ "error": "lookup failed" }));
    }
}
