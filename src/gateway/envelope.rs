//! Response envelope and normalized record types.
//!
//! # Responsibilities
//! - Define the stable output shape callers see regardless of outcome
//! - Enforce the envelope invariant: OK ⇔ success ⇔ non-empty result
//! - Serialize with the field names the original API consumers expect

use serde::{Deserialize, Serialize};

/// Outcome discriminator carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryStatus {
    /// Upstream call succeeded and at least one record survived filtering.
    Ok,
    /// Upstream call succeeded but nothing matched. Not an error.
    NoData,
    /// Transport or upstream HTTP failure.
    Error,
}

/// One population snapshot row after alias coalescing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "baseDate")]
    pub base_date: String,

    #[serde(rename = "districtName")]
    pub district_name: String,

    /// Hour-of-day bucket, absent for daily-sum rows.
    #[serde(rename = "timeSlot")]
    pub time_slot: Option<String>,

    /// Living population count. Missing upstream counts stay missing
    /// rather than collapsing to zero.
    #[serde(rename = "populationCount")]
    pub population_count: Option<f64>,
}

/// Uniform response wrapper returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub status: QueryStatus,
    pub message: String,
    pub result: Vec<NormalizedRecord>,

    /// Underlying error text, only present on ERROR envelopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub detail: Option<String>,
}

impl ResponseEnvelope {
    /// Successful query with a non-empty result list.
    pub fn ok(message: impl Into<String>, result: Vec<NormalizedRecord>) -> Self {
        debug_assert!(!result.is_empty(), "OK envelope requires records");
        Self {
            success: true,
            status: QueryStatus::Ok,
            message: message.into(),
            result,
            detail: None,
        }
    }

    /// Successful call that matched nothing.
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status: QueryStatus::NoData,
            message: message.into(),
            result: Vec::new(),
            detail: None,
        }
    }

    /// Upstream or transport failure.
    pub fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            success: false,
            status: QueryStatus::Error,
            message: message.into(),
            result: Vec::new(),
            detail: Some(detail.into()),
        }
    }
}
