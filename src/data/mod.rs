//! Data Module
//!
//! The data producer behind the cache: the resources a request can name,
//! and the trait the cache facade calls on a miss.

mod records;

pub use records::{Analytics, Demographics, GroupRate, Patient, RecordSet, Summary, HIGH_RISK_SCORE};

use serde_json::Value;

use crate::error::Result;

// == Resource ==
/// A logical resource served by the data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Summary statistics over all records
    Stats,
    /// One page of records
    PatientsPage { page: usize, limit: usize },
    /// A single record by id
    Patient { id: String },
    /// Grouped analytics bundle
    Analytics,
}

impl Resource {
    /// Key the resource is cached under.
    pub fn cache_key(&self) -> String {
        match self {
            Resource::Stats => "stats".to_string(),
            Resource::PatientsPage { page, limit } => format!("patients_{}_{}", page, limit),
            Resource::Patient { id } => format!("patient_{}", id),
            Resource::Analytics => "analytics".to_string(),
        }
    }
}

// == Data Producer ==
/// Computes fresh values for resources the cache cannot answer.
///
/// Returning an error (such as `ApiError::NotFound`) leaves the cache
/// untouched.
pub trait DataProducer: Send + Sync {
    /// Computes the value for `resource`.
    fn produce(&self, resource: &Resource) -> Result<Value>;

    /// Total number of records, used for pagination metadata.
    fn total_records(&self) -> usize;
}
