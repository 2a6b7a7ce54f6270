//! Request/response envelopes for the backend's JSON wire surface.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Contractor, Formula, Job, SystemInfo};

#[derive(Debug, Serialize)]
pub struct CreateTokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    /// Requested token lifetime in seconds.
    pub duration: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTokenResponse {
    /// The signed bearer token; opaque to the client.
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ListFormulasResponse {
    #[serde(default)]
    pub formulas: HashMap<String, Formula>,
}

#[derive(Debug, Deserialize)]
pub struct ListJobsResponse {
    #[serde(default)]
    pub jobs: HashMap<String, Job>,
}

#[derive(Debug, Deserialize)]
pub struct ListContractorsResponse {
    #[serde(default)]
    pub contractors: HashMap<String, Contractor>,
}

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub term: &'a str,
}

/// Matching ids in server-ranked order.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetFormulaResponse {
    pub formula: Formula,
}

#[derive(Debug, Deserialize)]
pub struct GetJobResponse {
    pub job: Job,
}

#[derive(Debug, Deserialize)]
pub struct GetContractorResponse {
    pub contractor: Contractor,
}

pub type GetSystemInfoResponse = SystemInfo;

/// Error body shape shared by all non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: String,
}
