use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;

use crate::market::interval::Interval;
use crate::market::kline::Kline;
use crate::market::store::Store;
use crate::market::ticker::Ticker;

/// Parses one upstream frame and, if it carries a kline or ticker event, applies
/// the corresponding mutation to the store. Stateless: safe to call concurrently
/// from any number of worker tasks. Malformed or unrecognized frames are discarded
/// after a log line; nothing here ever propagates an error to the caller.
pub async fn handle_frame(store: &Arc<Store>, frame: &str) {
    let value: Value = match serde_json::from_str(frame) {
        Ok(v) => v,
        Err(err) => {
            debug!("discarding non-JSON upstream frame: {err}");
            return;
        }
    };

    let Some(obj) = value.as_object() else {
        debug!("discarding non-object upstream frame");
        return;
    };

    let event_type = obj.get("e").and_then(Value::as_str);

    let event_type = match event_type {
        Some(e) => e,
        None => {
            if obj.contains_key("result") {
                debug!("discarding subscription acknowledgement");
            } else {
                debug!("discarding frame with no event-type field");
            }
            return;
        }
    };

    match event_type {
        "kline" => handle_kline_event(store, obj).await,
        "24hrTicker" => handle_ticker_event(store, obj).await,
        other => debug!("discarding unknown event type '{other}'"),
    }
}

async fn handle_kline_event(store: &Arc<Store>, obj: &serde_json::Map<String, Value>) {
    let Some(payload) = obj.get("k").and_then(Value::as_object) else {
        warn!("kline event missing 'k' payload");
        return;
    };

    let symbol = match payload.get("s").and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => {
            warn!("kline payload missing 's' (symbol)");
            return;
        }
    };

    let interval = match payload.get("i").and_then(Value::as_str) {
        Some(i) => match Interval::try_from(i) {
            Ok(interval) => interval,
            Err(_) => {
                debug!("discarding kline event with unconfigured interval '{i}'");
                return;
            }
        },
        None => {
            warn!("kline payload missing 'i' (interval)");
            return;
        }
    };

    match Kline::from_kline_payload(payload) {
        Ok(kline) => store.put_kline(&symbol, interval, kline).await,
        Err(err) => warn!("discarding malformed kline payload for {symbol}: {err}"),
    }
}

async fn handle_ticker_event(store: &Arc<Store>, obj: &serde_json::Map<String, Value>) {
    match Ticker::from_ticker_payload(obj) {
        Ok(ticker) => store.put_ticker(ticker).await,
        Err(err) => warn!("discarding malformed ticker payload: {err}"),
    }
}
