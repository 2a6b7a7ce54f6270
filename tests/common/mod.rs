//! Shared test harness: an in-process stub of the backend wire surface plus
//! a wired-up controller/store/session context pointed at it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use tintbook::api::ApiClient;
use tintbook::config::{AppConfig, Environment};
use tintbook::models::{Contractor, Formula, Job};
use tintbook::session::SessionStore;
use tintbook::store::AppStore;
use tintbook::sync::SyncController;

pub const TEST_TOKEN: &str = "stub-bearer-token";
pub const TEST_USER: &str = "alice";
pub const TEST_PASSWORD: &str = "secret";

#[derive(Default)]
pub struct StubData {
    pub formulas: HashMap<String, Formula>,
    pub jobs: HashMap<String, Job>,
    pub contractors: HashMap<String, Contractor>,
    next_id: usize,
}

impl StubData {
    fn assign_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub struct Counters {
    pub list_formulas: AtomicUsize,
    pub list_jobs: AtomicUsize,
    pub list_contractors: AtomicUsize,
}

pub struct StubBackend {
    pub data: Mutex<StubData>,
    pub counters: Counters,
    /// When set, the contractor list endpoint answers 500 so tests can
    /// exercise best-effort partial loads.
    pub fail_contractors: std::sync::atomic::AtomicBool,
}

pub struct TestServer {
    pub base_url: String,
    pub stub: Arc<StubBackend>,
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid or missing token" })))
        .into_response()
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": format!("{} not found", what) })))
        .into_response()
}

fn check_auth(headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if token == Some(TEST_TOKEN) {
        Ok(())
    } else {
        Err(unauthorized())
    }
}

async fn create_token(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if username == TEST_USER && password == TEST_PASSWORD {
        Json(json!({ "key": TEST_TOKEN })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "could not authenticate account" })))
            .into_response()
    }
}

async fn system_info() -> Response {
    Json(json!({
        "build_time": "2024-05-01T00:00:00Z",
        "commit": "abc1234",
        "semver": "0.1.0",
        "debug_enabled": true,
        "frontend_enabled": true,
    }))
    .into_response()
}

async fn list_formulas(State(stub): State<Arc<StubBackend>>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    stub.counters.list_formulas.fetch_add(1, Ordering::SeqCst);
    let data = stub.data.lock().unwrap();
    Json(json!({ "formulas": data.formulas })).into_response()
}

async fn get_formula(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let data = stub.data.lock().unwrap();
    match data.formulas.get(&id) {
        Some(formula) => Json(json!({ "formula": formula })).into_response(),
        None => not_found("formula"),
    }
}

async fn create_formula(
    State(stub): State<Arc<StubBackend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let duplicate = data.formulas.values().any(|f| f.name.eq_ignore_ascii_case(&name));
    if duplicate {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": format!("formula {} already exists", name) })),
        )
            .into_response();
    }
    let id = data.assign_id("f");
    let mut formula: Formula = match serde_json::from_value(with_id(body, &id)) {
        Ok(formula) => formula,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "message": e.to_string() })))
                .into_response()
        }
    };
    formula.id = id.clone();
    data.formulas.insert(id, formula.clone());
    (StatusCode::CREATED, Json(json!({ "formula": formula }))).into_response()
}

async fn update_formula(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    if !data.formulas.contains_key(&id) {
        return not_found("formula");
    }
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let duplicate = data
        .formulas
        .iter()
        .any(|(fid, f)| fid != &id && f.name.eq_ignore_ascii_case(&name));
    if duplicate {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": format!("formula {} already exists", name) })),
        )
            .into_response();
    }
    match serde_json::from_value::<Formula>(with_id(body, &id)) {
        Ok(formula) => {
            data.formulas.insert(id, formula);
            StatusCode::OK.into_response()
        }
        Err(e) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "message": e.to_string() }))).into_response()
        }
    }
}

async fn delete_formula(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    match data.formulas.remove(&id) {
        Some(_) => StatusCode::OK.into_response(),
        None => not_found("formula"),
    }
}

async fn search_formulas(
    State(stub): State<Arc<StubBackend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let term = body["term"].as_str().unwrap_or_default().to_lowercase();
    let data = stub.data.lock().unwrap();
    let mut results: Vec<String> = data
        .formulas
        .values()
        .filter(|f| {
            f.name.to_lowercase().contains(&term)
                || f.number.to_lowercase().contains(&term)
                || f.notes.to_lowercase().contains(&term)
        })
        .map(|f| f.id.clone())
        .collect();
    results.sort();
    Json(json!({ "results": results })).into_response()
}

async fn list_jobs(State(stub): State<Arc<StubBackend>>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    stub.counters.list_jobs.fetch_add(1, Ordering::SeqCst);
    let data = stub.data.lock().unwrap();
    Json(json!({ "jobs": data.jobs })).into_response()
}

async fn get_job(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let data = stub.data.lock().unwrap();
    match data.jobs.get(&id) {
        Some(job) => Json(json!({ "job": job })).into_response(),
        None => not_found("job"),
    }
}

async fn create_job(
    State(stub): State<Arc<StubBackend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    let id = data.assign_id("j");
    match serde_json::from_value::<Job>(with_id(body, &id)) {
        Ok(job) => {
            data.jobs.insert(id, job.clone());
            (StatusCode::CREATED, Json(json!({ "job": job }))).into_response()
        }
        Err(e) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "message": e.to_string() }))).into_response()
        }
    }
}

async fn update_job(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    if !data.jobs.contains_key(&id) {
        return not_found("job");
    }
    match serde_json::from_value::<Job>(with_id(body, &id)) {
        Ok(job) => {
            data.jobs.insert(id, job);
            StatusCode::OK.into_response()
        }
        Err(e) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "message": e.to_string() }))).into_response()
        }
    }
}

async fn delete_job(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    match data.jobs.remove(&id) {
        Some(_) => StatusCode::OK.into_response(),
        None => not_found("job"),
    }
}

async fn search_jobs(
    State(stub): State<Arc<StubBackend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let term = body["term"].as_str().unwrap_or_default().to_lowercase();
    let data = stub.data.lock().unwrap();
    let mut results: Vec<String> = data
        .jobs
        .values()
        .filter(|j| j.name.to_lowercase().contains(&term) || j.notes.to_lowercase().contains(&term))
        .map(|j| j.id.clone())
        .collect();
    results.sort();
    Json(json!({ "results": results })).into_response()
}

async fn list_contractors(State(stub): State<Arc<StubBackend>>, headers: HeaderMap) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    if stub.fail_contractors.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "contractor storage unavailable" })),
        )
            .into_response();
    }
    stub.counters.list_contractors.fetch_add(1, Ordering::SeqCst);
    let data = stub.data.lock().unwrap();
    Json(json!({ "contractors": data.contractors })).into_response()
}

async fn get_contractor(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let data = stub.data.lock().unwrap();
    match data.contractors.get(&id) {
        Some(contractor) => Json(json!({ "contractor": contractor })).into_response(),
        None => not_found("contractor"),
    }
}

async fn create_contractor(
    State(stub): State<Arc<StubBackend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    let id = data.assign_id("c");
    match serde_json::from_value::<Contractor>(with_id(body, &id)) {
        Ok(contractor) => {
            data.contractors.insert(id, contractor.clone());
            (StatusCode::CREATED, Json(json!({ "contractor": contractor }))).into_response()
        }
        Err(e) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "message": e.to_string() }))).into_response()
        }
    }
}

async fn update_contractor(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    if !data.contractors.contains_key(&id) {
        return not_found("contractor");
    }
    match serde_json::from_value::<Contractor>(with_id(body, &id)) {
        Ok(contractor) => {
            data.contractors.insert(id, contractor);
            StatusCode::OK.into_response()
        }
        Err(e) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "message": e.to_string() }))).into_response()
        }
    }
}

async fn delete_contractor(
    State(stub): State<Arc<StubBackend>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_auth(&headers) {
        return resp;
    }
    let mut data = stub.data.lock().unwrap();
    match data.contractors.remove(&id) {
        Some(_) => StatusCode::OK.into_response(),
        None => not_found("contractor"),
    }
}

/// Inject the server-assigned id into an incoming create/update body so it
/// deserializes into the full entity shape.
fn with_id(mut body: Value, id: &str) -> Value {
    body["id"] = json!(id);
    body
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let stub = Arc::new(StubBackend {
            data: Mutex::new(StubData::default()),
            counters: Counters::default(),
            fail_contractors: std::sync::atomic::AtomicBool::new(false),
        });

        let app = Router::new()
            .route("/api/tokens", post(create_token))
            .route("/api/system/info", get(system_info))
            .route("/api/formulas", get(list_formulas).post(create_formula))
            .route(
                "/api/formulas/:id",
                get(get_formula).put(update_formula).delete(delete_formula),
            )
            .route("/api/formulas/search", post(search_formulas))
            .route("/api/jobs", get(list_jobs).post(create_job))
            .route("/api/jobs/:id", get(get_job).put(update_job).delete(delete_job))
            .route("/api/jobs/search", post(search_jobs))
            .route("/api/contractors", get(list_contractors).post(create_contractor))
            .route(
                "/api/contractors/:id",
                get(get_contractor).put(update_contractor).delete(delete_contractor),
            )
            .with_state(stub.clone());

        let port = portpicker::pick_unused_port().expect("failed to pick free port");
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        let base_url = format!("http://127.0.0.1:{}", port);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Ok(Self { base_url, stub })
    }

    pub fn seed_formula(&self, id: &str, name: &str) -> Formula {
        let formula = Formula {
            id: id.to_string(),
            name: name.to_string(),
            number: String::new(),
            notes: String::new(),
            bases: Vec::new(),
            colorants: Vec::new(),
            jobs: Vec::new(),
        };
        self.stub.data.lock().unwrap().formulas.insert(id.to_string(), formula.clone());
        formula
    }

    pub fn seed_job(&self, id: &str, name: &str) -> Job {
        let job = Job {
            id: id.to_string(),
            name: name.to_string(),
            address: None,
            notes: String::new(),
            contact: None,
            formulas: Vec::new(),
            contractor_id: None,
        };
        self.stub.data.lock().unwrap().jobs.insert(id.to_string(), job.clone());
        job
    }

    pub fn seed_contractor(&self, id: &str, company: &str) -> Contractor {
        let contractor = Contractor {
            id: id.to_string(),
            company: company.to_string(),
            contact: None,
            jobs: Vec::new(),
        };
        self.stub.data.lock().unwrap().contractors.insert(id.to_string(), contractor.clone());
        contractor
    }

    pub fn list_counts(&self) -> (usize, usize, usize) {
        (
            self.stub.counters.list_formulas.load(Ordering::SeqCst),
            self.stub.counters.list_jobs.load(Ordering::SeqCst),
            self.stub.counters.list_contractors.load(Ordering::SeqCst),
        )
    }
}

/// A wired controller/store/session pointed at the stub, with a unique
/// throwaway credentials dir and background refresh off by default.
pub struct TestContext {
    pub controller: Arc<SyncController>,
    pub store: Arc<AppStore>,
    pub session: Arc<SessionStore>,
    pub client: Arc<ApiClient>,
    pub config: AppConfig,
}

pub fn test_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::from_env();
    config.environment = Environment::Development;
    config.api.base_url = base_url.to_string();
    config.sync.enable_background_refresh = false;
    config
}

pub fn build_context(config: &AppConfig) -> Result<TestContext> {
    let dir = std::env::temp_dir()
        .join("tintbook-tests")
        .join(uuid::Uuid::new_v4().to_string());
    let session = Arc::new(
        SessionStore::new(dir).with_token_duration(config.session.token_duration_secs),
    );
    let client = Arc::new(ApiClient::new(&config.api, session.clone())?);
    let store = Arc::new(AppStore::new());
    let controller = Arc::new(SyncController::new(
        config,
        store.clone(),
        client.clone(),
        session.clone(),
    ));
    Ok(TestContext { controller, store, session, client, config: config.clone() })
}

pub async fn logged_in_context(server: &TestServer) -> Result<TestContext> {
    let config = test_config(&server.base_url);
    let ctx = build_context(&config)?;
    ctx.controller.login(TEST_USER, TEST_PASSWORD).await?;
    Ok(ctx)
}
