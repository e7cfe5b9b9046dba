//! Outbound client for the Seoul open-data API.
//!
//! # Responsibilities
//! - Build the positional upstream URL (key, dataset, index range, date)
//! - Append optional filters as query parameters, omitted when absent
//! - Issue exactly one GET per invocation; no retries, no backoff
//! - Lenient extraction of the row collection from the nested payload
//!
//! # Design Decisions
//! - One shared `reqwest::Client` for connection reuse; the transport's
//!   defaults stand in for any deadline the config does not set
//! - Non-2xx and non-JSON answers are upstream failures; a 2xx JSON body
//!   with unexpected nesting degrades to an empty row set instead

use serde_json::Value;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::gateway::error::{GatewayError, GatewayResult};

/// Daily-sum living population by district.
pub const DAILY_SUM_DATASET: &str = "SPOP_DAILYSUM_JACHI";

/// Raw living-population dataset used by the passthrough route.
pub const LIVING_POPULATION_DATASET: &str = "LivingPopulation";

/// Thin wrapper over reqwest bound to one upstream host and access key.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl UpstreamClient {
    /// Build a client from validated configuration.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(timeouts.connect_secs))
            .timeout(std::time::Duration::from_secs(timeouts.upstream_secs))
            .build()?;
        let base_url = Url::parse(&upstream.base_url)?;
        Ok(Self {
            http,
            base_url,
            api_key: upstream.api_key.clone(),
        })
    }

    /// Construct `{base}/{key}/json/{dataset}/{start}/{end}[/{date}]` with
    /// the given filters appended as query parameters. Filters with no
    /// value never appear in the URL at all.
    pub fn build_url(
        &self,
        dataset: &str,
        start_index: u32,
        end_index: u32,
        base_date: Option<&str>,
        filters: &[(&str, &str)],
    ) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GatewayError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase))?;
            segments
                .pop_if_empty()
                .push(&self.api_key)
                .push("json")
                .push(dataset)
                .push(&start_index.to_string())
                .push(&end_index.to_string());
            if let Some(date) = base_date {
                segments.push(date);
            }
        }
        if !filters.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in filters {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    /// Single GET returning the parsed JSON body.
    pub async fn fetch_json(&self, url: Url) -> GatewayResult<Value> {
        tracing::debug!(url = %url, "Calling upstream");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
            });
        }
        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

/// Pull `payload[dataset].row` out of the upstream's nested shape.
///
/// Missing keys, a non-object payload, or a non-array `row` all yield an
/// empty list: malformed nesting degrades to NO_DATA, never to a panic or
/// an error envelope.
pub fn extract_rows(payload: &Value, dataset: &str) -> Vec<Value> {
    payload
        .get(dataset)
        .and_then(|v| v.get("row"))
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}
