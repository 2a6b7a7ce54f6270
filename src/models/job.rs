use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A customer work order, optionally linking formulas and a contractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    /// Ids of formulas used on this job.
    #[serde(default)]
    pub formulas: Vec<String>,
    #[serde(default)]
    pub contractor_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub street2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zipcode: String,
}

/// Shared contact shape for jobs and contractors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJob {
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub formulas: Vec<String>,
    #[serde(default)]
    pub contractor_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateJob {
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub formulas: Vec<String>,
    #[serde(default)]
    pub contractor_id: Option<String>,
}

impl CreateJob {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("job name is required".to_string()));
        }
        Ok(())
    }
}

impl UpdateJob {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("job name is required".to_string()));
        }
        Ok(())
    }
}
