use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A paint mixing recipe. Server-owned; the client holds read-through copies
/// keyed by the server-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub bases: Vec<Base>,
    #[serde(default)]
    pub colorants: Vec<Colorant>,
    /// Ids of jobs this formula is associated with.
    #[serde(default)]
    pub jobs: Vec<String>,
}

/// One base paint line item. Order within a formula is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    #[serde(default)]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub amount: String,
}

/// One colorant line item. Order within a formula is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colorant {
    #[serde(default)]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub amount: String,
}

/// Create payload; the id is assigned server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFormula {
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub bases: Vec<Base>,
    #[serde(default)]
    pub colorants: Vec<Colorant>,
    #[serde(default)]
    pub jobs: Vec<String>,
}

/// Full-replacement update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFormula {
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub bases: Vec<Base>,
    #[serde(default)]
    pub colorants: Vec<Colorant>,
    #[serde(default)]
    pub jobs: Vec<String>,
}

impl CreateFormula {
    /// Shape check at the remote client boundary; the server additionally
    /// enforces name uniqueness.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("formula name is required".to_string()));
        }
        Ok(())
    }
}

impl UpdateFormula {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("formula name is required".to_string()));
        }
        Ok(())
    }
}
