//! Row filtering and field normalization.
//!
//! # Responsibilities
//! - Coalesce the upstream's inconsistent field aliases into one shape
//! - Apply the district (substring) and time-slot (exact) filters
//! - Compensate for casual district input missing the "구" suffix
//!
//! # Design Decisions
//! - Alias pairs live in one declarative table instead of inline `a || b`
//!   fallbacks, so adding a new upstream schema variant is a data change
//! - Filtering happens here even though the upstream accepts the same
//!   parameters: upstream-side filtering is partial and unreliable
//! - Rows are `serde_json::Value` maps because the upstream schema differs
//!   between API versions; typing happens on the way out

use serde_json::Value;

use crate::gateway::envelope::NormalizedRecord;

/// Mapping from one output field to its upstream aliases, primary first.
pub struct FieldAliases {
    /// `baseDate` — snapshot date.
    pub base_date: [&'static str; 2],
    /// `districtName` — administrative district (GU).
    pub district: [&'static str; 2],
    /// `populationCount` — living population count.
    pub population: [&'static str; 2],
    /// `timeSlot` — hour bucket; single-alias field.
    pub time_slot: &'static str,
}

/// Aliases observed across versions of the daily-sum population dataset.
pub const DAILY_SUM_ALIASES: FieldAliases = FieldAliases {
    base_date: ["BASE_DATE", "STDR_DE_ID"],
    district: ["GU_NM", "SIGNGU_NM"],
    population: ["TOT_LVPOP_CO", "LVPOP_CO"],
    time_slot: "TIME_SLOT",
};

/// Administrative-district suffix appended to bare district stems.
const DISTRICT_SUFFIX: char = '구';

/// Append the "구" suffix when user input omitted it ("동대문" → "동대문구").
pub fn normalize_district(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.ends_with(DISTRICT_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{DISTRICT_SUFFIX}")
    }
}

/// Render a JSON scalar as the string form used for matching and output.
fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First present alias, rendered as a string.
fn coalesce_string(row: &Value, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|key| row.get(*key))
        .find_map(value_as_string)
}

/// First present alias, parsed as a number. The upstream emits counts both
/// as JSON numbers and as numeric strings depending on dataset version.
/// Counts are non-negative by contract; anything negative is unusable and
/// treated as missing, like any other unparseable value.
fn coalesce_number(row: &Value, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .filter_map(|key| row.get(*key))
        .find_map(|value| {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            parsed.filter(|c| *c >= 0.0)
        })
}

/// Substring match of the (already normalized) district name against either
/// district alias. Containment rather than equality: upstream names may
/// carry extra qualifiers.
fn district_matches(row: &Value, aliases: &FieldAliases, district: &str) -> bool {
    aliases
        .district
        .iter()
        .filter_map(|key| row.get(*key))
        .filter_map(value_as_string)
        .any(|name| name.contains(district))
}

/// Exact equality of the rendered time-slot value.
fn time_slot_matches(row: &Value, aliases: &FieldAliases, slot: &str) -> bool {
    row.get(aliases.time_slot)
        .and_then(value_as_string)
        .is_some_and(|v| v == slot)
}

/// Coalesce one upstream row into the stable output shape.
pub fn normalize_row(row: &Value, aliases: &FieldAliases) -> NormalizedRecord {
    NormalizedRecord {
        base_date: coalesce_string(row, &aliases.base_date).unwrap_or_default(),
        district_name: coalesce_string(row, &aliases.district).unwrap_or_default(),
        time_slot: coalesce_string(row, &[aliases.time_slot]),
        population_count: coalesce_number(row, &aliases.population),
    }
}

/// Filter rows by district/time-slot and normalize the survivors.
///
/// `district` must already be suffix-normalized by the caller.
pub fn filter_and_normalize(
    rows: &[Value],
    aliases: &FieldAliases,
    district: Option<&str>,
    time_slot: Option<&str>,
) -> Vec<NormalizedRecord> {
    rows.iter()
        .filter(|row| {
            let gu_ok = district
                .map(|d| district_matches(row, aliases, d))
                .unwrap_or(true);
            let slot_ok = time_slot
                .map(|t| time_slot_matches(row, aliases, t))
                .unwrap_or(true);
            gu_ok && slot_ok
        })
        .map(|row| normalize_row(row, aliases))
        .collect()
}
