//! Calendar-date and lenient-field helpers shared by the paper and review models
//!
//! Paper files are edited by other tools, so a malformed value in one record
//! must not make the whole collection unreadable. The `deserialize_*` helpers
//! here read a raw JSON value and fall back to a default with a warning.

use chrono::{Datelike, Months, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Add whole years to a date. Feb 29 rolls over to Mar 1 in non-leap years.
/// Returns `None` when the result falls outside chrono's representable range.
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    let months = years.checked_mul(12)?;
    let shifted = date.checked_add_months(Months::new(months))?;
    if shifted.day() != date.day() {
        // chrono clamps to the last day of the month
        shifted.succ_opt()
    } else {
        Some(shifted)
    }
}

/// Convert a raw JSON value, mapping `null` to `None` and a wrong type to `None` with a warning
fn lenient_from_value<T: DeserializeOwned>(raw: Option<Value>) -> Option<T> {
    match raw {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Ignoring malformed value {}: {}", value, e);
                None
            }
        },
    }
}

/// Deserialize an optional value, mapping `null` or a wrong type to `None`.
pub fn deserialize_lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(lenient_from_value(raw))
}

/// Deserialize a value, mapping `null` or a wrong type to `T::default()`.
pub fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(deserialize_lenient_option(deserializer)?.unwrap_or_default())
}

/// Deserialize a list, dropping malformed entries instead of the whole list.
///
/// A `null` or non-array value yields an empty list.
pub fn deserialize_valid_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    let entries = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            log::warn!("Ignoring non-list value {}", other);
            return Ok(Vec::new());
        }
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| lenient_from_value(Some(entry)))
        .collect())
}

/// Deserialize an optional `YYYY-MM-DD` date, mapping anything unparseable to `None`.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    let parsed = match raw {
        Some(Value::String(s)) => parse_date(&s),
        _ => None,
    };
    Ok(parsed)
}

/// Parse `YYYY-MM-DD`, also accepting a full RFC 3339 timestamp (date part kept).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    match chrono::DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Some(dt.date_naive()),
        Err(_) => {
            log::warn!("Ignoring unparseable date {:?}", s);
            None
        }
    }
}
