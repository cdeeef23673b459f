use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::exchange::types::ApiResult;
use crate::utils::number::{parse_bool_from_lookup, parse_str_from_lookup, parse_u64_from_lookup};

/// One completed (or in-progress) candle for a (symbol, interval) series.
///
/// Field names match the upstream wire contract exactly (`t`, `o`, `h`, ...) since
/// the same struct is re-serialized verbatim to HTTP and WebSocket consumers.
/// Price and volume fields stay `String` end to end — never parsed to `f64` — so the
/// exact decimal token the exchange sent is what a client ultimately reads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Kline {
    #[serde(rename = "t")]
    pub open_time: u64,
    #[serde(rename = "o")]
    pub open: String,
    #[serde(rename = "h")]
    pub high: String,
    #[serde(rename = "l")]
    pub low: String,
    #[serde(rename = "c")]
    pub close: String,
    #[serde(rename = "v")]
    pub volume: String,
    #[serde(rename = "T")]
    pub close_time: u64,
    #[serde(rename = "q")]
    pub quote_volume: String,
    #[serde(rename = "n")]
    pub trades: u64,
    #[serde(rename = "V")]
    pub taker_buy_base_volume: String,
    #[serde(rename = "Q")]
    pub taker_buy_quote_volume: String,
    #[serde(rename = "x")]
    pub is_closed: bool,
}

impl Kline {
    /// Builds a `Kline` from the nested `k` payload of an upstream kline event,
    /// copying fields 1:1 by the same letter keys this struct serializes with.
    pub fn from_kline_payload(payload: &Map<String, Value>) -> ApiResult<Self> {
        Ok(Self {
            open_time: parse_u64_from_lookup("t", payload)?,
            open: parse_str_from_lookup("o", payload)?,
            high: parse_str_from_lookup("h", payload)?,
            low: parse_str_from_lookup("l", payload)?,
            close: parse_str_from_lookup("c", payload)?,
            volume: parse_str_from_lookup("v", payload)?,
            close_time: parse_u64_from_lookup("T", payload)?,
            quote_volume: parse_str_from_lookup("q", payload)?,
            trades: parse_u64_from_lookup("n", payload)?,
            taker_buy_base_volume: parse_str_from_lookup("V", payload)?,
            taker_buy_quote_volume: parse_str_from_lookup("Q", payload)?,
            is_closed: parse_bool_from_lookup("x", payload)?,
        })
    }
}
