use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::exchange::types::ApiResult;
use crate::utils::number::{parse_str_from_lookup, parse_u64_from_lookup};

/// Latest 24h ticker snapshot for a symbol. Only the latest event per symbol is kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ticker {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c")]
    pub price: String,
    #[serde(rename = "v")]
    pub volume: String,
    #[serde(rename = "q")]
    pub quote_volume: String,
    #[serde(rename = "P")]
    pub price_change_percent: String,
    #[serde(rename = "h")]
    pub high: String,
    #[serde(rename = "l")]
    pub low: String,
    #[serde(rename = "t")]
    pub update_time: u64,
}

impl Ticker {
    /// Builds a `Ticker` from an upstream `24hrTicker` event, keyed the same way it
    /// serializes: the event's `E` (event time) becomes our `t` (update_time).
    pub fn from_ticker_payload(payload: &Map<String, Value>) -> ApiResult<Self> {
        Ok(Self {
            symbol: parse_str_from_lookup("s", payload)?,
            price: parse_str_from_lookup("c", payload)?,
            volume: parse_str_from_lookup("v", payload)?,
            quote_volume: parse_str_from_lookup("q", payload)?,
            price_change_percent: parse_str_from_lookup("P", payload)?,
            high: parse_str_from_lookup("h", payload)?,
            low: parse_str_from_lookup("l", payload)?,
            update_time: parse_u64_from_lookup("E", payload)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Map<String, Value> {
        json!({
            "s": "BTCUSDT",
            "c": "26696.12000000",
            "v": "34270.86586000",
            "q": "924029314.52493560",
            "P": "-2.182",
            "h": "27359.93000000",
            "l": "26613.00000000",
            "E": 1_684_932_971_410u64,
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn parses_ticker_preserving_decimal_tokens() {
        let ticker = Ticker::from_ticker_payload(&sample_payload()).unwrap();
        assert_eq!(ticker.symbol, "BTCUSDT");
        assert_eq!(ticker.price, "26696.12000000");
        assert_eq!(ticker.update_time, 1_684_932_971_410);
    }

    #[test]
    fn serializes_with_letter_keys() {
        let ticker = Ticker::from_ticker_payload(&sample_payload()).unwrap();
        let v = serde_json::to_value(&ticker).unwrap();
        assert_eq!(v["s"], "BTCUSDT");
        assert_eq!(v["t"], 1_684_932_971_410u64);
    }

    #[test]
    fn missing_field_is_an_error() {
        let mut payload = sample_payload();
        payload.remove("c");
        assert!(Ticker::from_ticker_payload(&payload).is_err());
    }
}
