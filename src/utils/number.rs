use serde_json::{Map, Value};

use crate::exchange::types::ApiError;
use crate::exchange::types::ApiResult;

/// Reads a string-valued field from a JSON object lookup without parsing it.
///
/// Binance ships prices and volumes as JSON strings precisely so that clients
/// don't have to round-trip them through a binary float. This is the string
/// counterpart of the old `parse_f64_from_lookup` helper: it hands back the
/// token untouched instead of calling `.parse::<f64>()` on it.
pub fn parse_str_from_lookup(key: &str, lookup: &Map<String, Value>) -> ApiResult<String> {
    lookup
        .get(key)
        .ok_or_else(|| ApiError::Parsing(format!("'{key}' missing from data lookup")))?
        .as_str()
        .ok_or_else(|| ApiError::Parsing(format!("'{key}' is not a JSON string")))
        .map(|s| s.to_string())
}

/// Reads a `u64`-valued field from a JSON object lookup.
pub fn parse_u64_from_lookup(key: &str, lookup: &Map<String, Value>) -> ApiResult<u64> {
    lookup
        .get(key)
        .ok_or_else(|| ApiError::Parsing(format!("'{key}' missing from data lookup")))?
        .as_u64()
        .ok_or_else(|| ApiError::Parsing(format!("'{key}' is not a JSON integer")))
}

/// Reads a `bool`-valued field from a JSON object lookup.
pub fn parse_bool_from_lookup(key: &str, lookup: &Map<String, Value>) -> ApiResult<bool> {
    lookup
        .get(key)
        .ok_or_else(|| ApiError::Parsing(format!("'{key}' missing from data lookup")))?
        .as_bool()
        .ok_or_else(|| ApiError::Parsing(format!("'{key}' is not a JSON boolean")))
}
