//! Inbound route handlers.
//!
//! # Responsibilities
//! - Map query parameters (original upstream-style names) onto QueryRequest
//! - Choose the HTTP status for each envelope outcome
//! - Keep the passthrough route byte-faithful to the upstream body
//!
//! # Design Decisions
//! - NO_DATA is HTTP 200: an empty match is a successful call
//! - ERROR envelopes surface as HTTP 500 with the detail text attached
//! - Handlers hold no logic beyond translation; the gateway does the work

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::gateway::client::LIVING_POPULATION_DATASET;
use crate::gateway::envelope::QueryStatus;
use crate::gateway::query::{DEFAULT_END_INDEX, DEFAULT_START_INDEX, QueryRequest};
use crate::http::request::request_id;
use crate::http::server::AppState;

/// Query parameters for `GET /population`, named as the upstream names them.
#[derive(Debug, Deserialize)]
pub struct PopulationParams {
    #[serde(rename = "startIndex")]
    pub start_index: Option<u32>,

    #[serde(rename = "endIndex")]
    pub end_index: Option<u32>,

    #[serde(rename = "baseDate")]
    pub base_date: Option<String>,

    #[serde(rename = "GU_NM")]
    pub gu_nm: Option<String>,

    #[serde(rename = "TIME_SLOT")]
    pub time_slot: Option<String>,
}

/// Query parameters for the raw `GET /seoul-living` passthrough.
#[derive(Debug, Deserialize)]
pub struct LivingParams {
    #[serde(rename = "startIndex")]
    pub start_index: Option<u32>,

    #[serde(rename = "endIndex")]
    pub end_index: Option<u32>,

    #[serde(rename = "startDate")]
    pub start_date: Option<String>,

    #[serde(rename = "endDate")]
    pub end_date: Option<String>,

    #[serde(rename = "dongCode")]
    pub dong_code: Option<String>,
}

/// Treat empty or whitespace-only parameter values as absent. Callers that
/// send `GU_NM=` mean "no filter", not "filter on the empty string".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalized population query: filter, coalesce, envelope.
pub async fn population(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PopulationParams>,
) -> Response {
    let request = QueryRequest {
        start_index: params.start_index.unwrap_or(DEFAULT_START_INDEX),
        end_index: params.end_index.unwrap_or(DEFAULT_END_INDEX),
        base_date: non_empty(params.base_date),
        district_name: non_empty(params.gu_nm),
        time_slot: non_empty(params.time_slot),
    };

    tracing::debug!(
        request_id = %request_id(&headers),
        start_index = request.start_index,
        end_index = request.end_index,
        district = ?request.district_name,
        time_slot = ?request.time_slot,
        "Population query"
    );

    let envelope = state.gateway.query_population(&request).await;
    let code = match envelope.status {
        QueryStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
        // NO_DATA is a successful call with an empty match, not an error.
        QueryStatus::Ok | QueryStatus::NoData => StatusCode::OK,
    };
    (code, Json(envelope)).into_response()
}

/// Raw passthrough of the living-population dataset.
pub async fn seoul_living(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<LivingParams>,
) -> Response {
    let start_date = non_empty(params.start_date);
    let end_date = non_empty(params.end_date);
    let dong_code = non_empty(params.dong_code);

    let mut filters: Vec<(&str, &str)> = Vec::new();
    if let Some(v) = start_date.as_deref() {
        filters.push(("startDate", v));
    }
    if let Some(v) = end_date.as_deref() {
        filters.push(("endDate", v));
    }
    if let Some(v) = dong_code.as_deref() {
        filters.push(("dongCode", v));
    }

    let result = state
        .gateway
        .fetch_raw(
            LIVING_POPULATION_DATASET,
            params.start_index.unwrap_or(1),
            params.end_index.unwrap_or(100),
            &filters,
        )
        .await;

    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            tracing::error!(
                request_id = %request_id(&headers),
                error = %e,
                "Error fetching from Seoul OpenAPI"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch data from Seoul API" })),
            )
                .into_response()
        }
    }
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
