//! Population query orchestration.
//!
//! One routine covers what used to be several near-identical handlers:
//! build the upstream URL, fetch, filter, normalize, wrap in the envelope.
//! The raw passthrough used by `/seoul-living` is the degenerate case of
//! the same upstream-call primitive with no filtering and no normalization.

use serde_json::Value;

use crate::config::GatewayConfig;
use crate::gateway::client::{extract_rows, UpstreamClient, DAILY_SUM_DATASET};
use crate::gateway::envelope::{NormalizedRecord, ResponseEnvelope};
use crate::gateway::error::GatewayResult;
use crate::gateway::normalize::{filter_and_normalize, normalize_district, DAILY_SUM_ALIASES};

/// Default index range for `/population` when the caller sends none.
pub const DEFAULT_START_INDEX: u32 = 1;
pub const DEFAULT_END_INDEX: u32 = 5;

/// Localized caller-facing messages, kept identical to the original service.
pub const MSG_OK: &str = "생활인구 데이터 조회 성공";
pub const MSG_NO_DATA: &str = "해당 날짜와 시간의 생활인구 데이터가 없습니다.";
pub const MSG_ERROR: &str = "서울열린데이터 API 호출 중 오류가 발생했습니다.";

/// A normalized population query, one per inbound request.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// 1-based inclusive range into the upstream row set.
    pub start_index: u32,
    pub end_index: u32,

    /// Snapshot date (YYYYMMDD), embedded positionally in the path.
    pub base_date: Option<String>,

    /// District filter; suffix-normalized before matching.
    pub district_name: Option<String>,

    /// Hour bucket filter; matched exactly.
    pub time_slot: Option<String>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            start_index: DEFAULT_START_INDEX,
            end_index: DEFAULT_END_INDEX,
            base_date: None,
            district_name: None,
            time_slot: None,
        }
    }
}

/// The gateway core: holds the upstream client, owns no other state.
#[derive(Debug, Clone)]
pub struct PopulationGateway {
    client: UpstreamClient,
}

impl PopulationGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = UpstreamClient::new(&config.upstream, &config.timeouts)?;
        Ok(Self { client })
    }

    /// Run one population query end to end and produce the envelope.
    ///
    /// Exactly one outbound call happens per invocation. Transport and
    /// upstream HTTP failures become ERROR envelopes; an empty result is
    /// NO_DATA and not an error.
    pub async fn query_population(&self, request: &QueryRequest) -> ResponseEnvelope {
        let district = request.district_name.as_deref().map(normalize_district);

        // Filters are forwarded upstream and re-applied locally: the
        // upstream honors them only partially.
        let mut filters: Vec<(&str, &str)> = Vec::new();
        if let Some(d) = district.as_deref() {
            filters.push(("GU_NM", d));
        }
        if let Some(t) = request.time_slot.as_deref() {
            filters.push(("TIME_SLOT", t));
        }

        let fetch = async {
            let url = self.client.build_url(
                DAILY_SUM_DATASET,
                request.start_index,
                request.end_index,
                request.base_date.as_deref(),
                &filters,
            )?;
            self.client.fetch_json(url).await
        };
        let payload = match fetch.await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, district = ?district, "Upstream call failed");
                return ResponseEnvelope::error(MSG_ERROR, e.detail());
            }
        };

        let rows = extract_rows(&payload, DAILY_SUM_DATASET);
        let records = filter_and_normalize(
            &rows,
            &DAILY_SUM_ALIASES,
            district.as_deref(),
            request.time_slot.as_deref(),
        );

        if records.is_empty() {
            tracing::debug!(
                fetched_rows = rows.len(),
                district = ?district,
                time_slot = ?request.time_slot,
                "No rows matched"
            );
            return ResponseEnvelope::no_data(MSG_NO_DATA);
        }

        tracing::debug!(
            fetched_rows = rows.len(),
            matched = records.len(),
            "Population query succeeded"
        );
        let message = summarize(&records[0]);
        ResponseEnvelope::ok(message, records)
    }

    /// Passthrough fetch: same URL machinery, body returned unmodified.
    pub async fn fetch_raw(
        &self,
        dataset: &str,
        start_index: u32,
        end_index: u32,
        filters: &[(&str, &str)],
    ) -> GatewayResult<Value> {
        let url = self
            .client
            .build_url(dataset, start_index, end_index, None, filters)?;
        self.client.fetch_json(url).await
    }
}

/// Natural-language summary from the first matching record, with a generic
/// fallback when the record is missing the fields the sentence needs.
fn summarize(record: &NormalizedRecord) -> String {
    let count = match record.population_count {
        Some(c) if !record.base_date.is_empty() && !record.district_name.is_empty() => c,
        _ => return MSG_OK.to_string(),
    };
    let slot = record
        .time_slot
        .as_deref()
        .map(|t| format!(" {t}시"))
        .unwrap_or_default();
    format!(
        "{} {}{} 생활인구 약 {}명",
        record.base_date,
        record.district_name,
        slot,
        format_count(count)
    )
}

/// Round and group digits in threes: 1234567.8 → "1,234,568".
fn format_count(count: f64) -> String {
    let rounded = count.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
