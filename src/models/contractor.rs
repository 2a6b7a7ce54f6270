use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::job::Contact;

/// A company associated with one or more jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contractor {
    pub id: String,
    pub company: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    /// Ids of jobs this contractor is attached to.
    #[serde(default)]
    pub jobs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateContractor {
    pub company: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub jobs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContractor {
    pub company: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub jobs: Vec<String>,
}

impl CreateContractor {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.company.trim().is_empty() {
            return Err(ApiError::Validation("contractor company is required".to_string()));
        }
        Ok(())
    }
}

impl UpdateContractor {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.company.trim().is_empty() {
            return Err(ApiError::Validation("contractor company is required".to_string()));
        }
        Ok(())
    }
}
