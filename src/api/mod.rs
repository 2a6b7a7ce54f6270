//! Remote client: one typed async method per backend operation.
//!
//! Every authenticated call reads the bearer token from the session store at
//! call time and fails fast with `ApiError::NotLoggedIn` before any network
//! I/O when the markers are absent. List/search responses are converted from
//! their wire envelopes into the id-keyed shapes the collection cache holds.

pub mod wire;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{
    Contractor, CreateContractor, CreateFormula, CreateJob, Formula, Job, SystemInfo,
    UpdateContractor, UpdateFormula, UpdateJob,
};
use crate::session::SessionStore;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| anyhow::anyhow!("invalid API base url '{}': {}", config.base_url, e))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http, base_url, session })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::Validation(format!("invalid endpoint path: {}", path)))
    }

    /// Attach the current bearer token, or refuse to send at all.
    fn authenticated(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.session.bearer_token().ok_or(ApiError::NotLoggedIn)?;
        Ok(builder.bearer_auth(token))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }
        Ok(response.json::<T>().await?)
    }

    async fn expect_ok(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }
        Ok(())
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiError {
        let message = response
            .json::<wire::ErrorResponse>()
            .await
            .map(|body| body.message)
            .unwrap_or_default();
        ApiError::from_status(status.as_u16(), message)
    }

    async fn get_authed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authenticated(self.http.get(self.endpoint(path)?))?;
        Self::decode(request.send().await?).await
    }

    async fn send_authed<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self.http.request(method, self.endpoint(path)?);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let request = self.authenticated(builder)?;
        Ok(request.send().await?)
    }

    // --- auth ---

    /// Exchange credentials for a bearer token. Unauthenticated; an invalid
    /// username/password pair surfaces as `InvalidCredentials`.
    pub async fn create_token(
        &self,
        username: &str,
        password: &str,
        duration_secs: u64,
    ) -> Result<String, ApiError> {
        let body = wire::CreateTokenRequest { username, password, duration: duration_secs };
        let response = self
            .http
            .post(self.endpoint("/api/tokens")?)
            .json(&body)
            .send()
            .await?;

        // The backend answers 401 or 404 for a bad account/password pair;
        // both mean the same thing to a login form.
        match response.status().as_u16() {
            401 | 404 => return Err(ApiError::InvalidCredentials),
            _ => {}
        }
        let token: wire::CreateTokenResponse = Self::decode(response).await?;
        Ok(token.key)
    }

    // --- system ---

    /// Unauthenticated build/deployment snapshot.
    pub async fn get_system_info(&self) -> Result<SystemInfo, ApiError> {
        let response = self.http.get(self.endpoint("/api/system/info")?).send().await?;
        Self::decode(response).await
    }

    // --- formulas ---

    pub async fn get_formula(&self, id: &str) -> Result<Formula, ApiError> {
        let response: wire::GetFormulaResponse =
            self.get_authed(&format!("/api/formulas/{}", id)).await?;
        Ok(response.formula)
    }

    pub async fn list_formulas(&self) -> Result<HashMap<String, Formula>, ApiError> {
        let response: wire::ListFormulasResponse = self.get_authed("/api/formulas").await?;
        Ok(response.formulas)
    }

    pub async fn search_formulas(&self, term: &str) -> Result<Vec<String>, ApiError> {
        let body = wire::SearchRequest { term };
        let response = self.send_authed(Method::POST, "/api/formulas/search", Some(&body)).await?;
        let results: wire::SearchResponse = Self::decode(response).await?;
        Ok(results.results)
    }

    /// Create a formula; rejects with `Conflict` when the name collides.
    pub async fn create_formula(&self, payload: &CreateFormula) -> Result<Formula, ApiError> {
        payload.validate()?;
        let response = self.send_authed(Method::POST, "/api/formulas", Some(payload)).await?;
        let created: wire::GetFormulaResponse = Self::decode(response).await?;
        Ok(created.formula)
    }

    pub async fn update_formula(&self, id: &str, payload: &UpdateFormula) -> Result<(), ApiError> {
        payload.validate()?;
        let response = self
            .send_authed(Method::PUT, &format!("/api/formulas/{}", id), Some(payload))
            .await?;
        Self::expect_ok(response).await
    }

    pub async fn delete_formula(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_authed::<()>(Method::DELETE, &format!("/api/formulas/{}", id), None)
            .await?;
        Self::expect_ok(response).await
    }

    // --- jobs ---

    pub async fn get_job(&self, id: &str) -> Result<Job, ApiError> {
        let response: wire::GetJobResponse = self.get_authed(&format!("/api/jobs/{}", id)).await?;
        Ok(response.job)
    }

    pub async fn list_jobs(&self) -> Result<HashMap<String, Job>, ApiError> {
        let response: wire::ListJobsResponse = self.get_authed("/api/jobs").await?;
        Ok(response.jobs)
    }

    pub async fn search_jobs(&self, term: &str) -> Result<Vec<String>, ApiError> {
        let body = wire::SearchRequest { term };
        let response = self.send_authed(Method::POST, "/api/jobs/search", Some(&body)).await?;
        let results: wire::SearchResponse = Self::decode(response).await?;
        Ok(results.results)
    }

    pub async fn create_job(&self, payload: &CreateJob) -> Result<Job, ApiError> {
        payload.validate()?;
        let response = self.send_authed(Method::POST, "/api/jobs", Some(payload)).await?;
        let created: wire::GetJobResponse = Self::decode(response).await?;
        Ok(created.job)
    }

    pub async fn update_job(&self, id: &str, payload: &UpdateJob) -> Result<(), ApiError> {
        payload.validate()?;
        let response =
            self.send_authed(Method::PUT, &format!("/api/jobs/{}", id), Some(payload)).await?;
        Self::expect_ok(response).await
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        let response =
            self.send_authed::<()>(Method::DELETE, &format!("/api/jobs/{}", id), None).await?;
        Self::expect_ok(response).await
    }

    // --- contractors ---

    pub async fn get_contractor(&self, id: &str) -> Result<Contractor, ApiError> {
        let response: wire::GetContractorResponse =
            self.get_authed(&format!("/api/contractors/{}", id)).await?;
        Ok(response.contractor)
    }

    pub async fn list_contractors(&self) -> Result<HashMap<String, Contractor>, ApiError> {
        let response: wire::ListContractorsResponse = self.get_authed("/api/contractors").await?;
        Ok(response.contractors)
    }

    pub async fn create_contractor(
        &self,
        payload: &CreateContractor,
    ) -> Result<Contractor, ApiError> {
        payload.validate()?;
        let response = self.send_authed(Method::POST, "/api/contractors", Some(payload)).await?;
        let created: wire::GetContractorResponse = Self::decode(response).await?;
        Ok(created.contractor)
    }

    pub async fn update_contractor(
        &self,
        id: &str,
        payload: &UpdateContractor,
    ) -> Result<(), ApiError> {
        payload.validate()?;
        let response = self
            .send_authed(Method::PUT, &format!("/api/contractors/{}", id), Some(payload))
            .await?;
        Self::expect_ok(response).await
    }

    pub async fn delete_contractor(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .send_authed::<()>(Method::DELETE, &format!("/api/contractors/{}", id), None)
            .await?;
        Self::expect_ok(response).await
    }
}
