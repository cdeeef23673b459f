use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use serde_json::json;
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::config::Config;
use crate::market::demux;
use crate::market::interval::Interval;
use crate::market::store::Store;

/// Upstream partition size: at most this many stream names share one connection.
pub const MAX_STREAMS_PER_CONN: usize = 200;

const UPSTREAM_WS_URL: &str = "wss://stream.binance.com:9443/ws";
const DIAL_BACKOFF: Duration = Duration::from_secs(5);
const POST_CONNECT_BACKOFF: Duration = Duration::from_secs(1);

static SUBSCRIBE_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Builds the full stream-name list: one ticker stream and one kline stream per
/// configured interval, for each symbol, in input order — so a single symbol's
/// streams are always contiguous and survive chunking onto the same worker.
pub fn build_stream_list(symbols: &[String], intervals: &[Interval]) -> Vec<String> {
    let mut streams = Vec::with_capacity(symbols.len() * (intervals.len() + 1));
    for symbol in symbols {
        let lower = symbol.to_lowercase();
        streams.push(format!("{lower}@ticker"));
        for interval in intervals {
            streams.push(format!("{lower}@kline_{interval}"));
        }
    }
    streams
}

/// Packs a stream list into contiguous chunks of at most `MAX_STREAMS_PER_CONN`.
pub fn partition_streams(streams: &[String]) -> Vec<Vec<String>> {
    streams
        .chunks(MAX_STREAMS_PER_CONN)
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Launches one long-lived reconnecting worker per chunk. Returns once every
/// worker has been spawned; the workers themselves run forever.
pub fn spawn_pool(store: Arc<Store>, config: &Config) {
    let streams = build_stream_list(&config.symbols, config.intervals());
    let chunks = partition_streams(&streams);

    info!(
        "upstream pool: {} streams across {} connections",
        streams.len(),
        chunks.len()
    );

    for (worker_id, chunk) in chunks.into_iter().enumerate() {
        let store = store.clone();
        tokio::spawn(async move { run_worker(worker_id, chunk, store).await });
    }
}

enum WorkerState {
    Connecting,
    Backoff(Duration),
}

/// One chunk's infinite reconnection loop. Workers never exit, never share state,
/// and never coordinate with each other.
async fn run_worker(worker_id: usize, streams: Vec<String>, store: Arc<Store>) {
    let mut state = WorkerState::Connecting;

    loop {
        match state {
            WorkerState::Backoff(d) => {
                sleep(d).await;
                state = WorkerState::Connecting;
            }
            WorkerState::Connecting => {
                state = match connect_async(UPSTREAM_WS_URL).await {
                    Ok((ws_stream, _)) => {
                        info!("worker {worker_id}: connected, subscribing {} streams", streams.len());

                        let (mut sink, mut source) = ws_stream.split();
                        let request_id = SUBSCRIBE_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
                        let subscribe = json!({
                            "method": "SUBSCRIBE",
                            "params": streams,
                            "id": request_id,
                        });

                        match sink.send(Message::Text(subscribe.to_string())).await {
                            Ok(()) => {
                                info!("worker {worker_id}: subscribed, reading");
                                read_until_error(worker_id, &mut source, &store).await;
                                warn!("worker {worker_id}: read loop ended, backing off");
                                WorkerState::Backoff(POST_CONNECT_BACKOFF)
                            }
                            Err(err) => {
                                warn!("worker {worker_id}: subscribe failed: {err}");
                                WorkerState::Backoff(POST_CONNECT_BACKOFF)
                            }
                        }
                    }
                    Err(err) => {
                        warn!("worker {worker_id}: dial failed: {err}");
                        WorkerState::Backoff(DIAL_BACKOFF)
                    }
                };
            }
        }
    }
}

async fn read_until_error(
    worker_id: usize,
    source: &mut futures_util::stream::SplitStream<
        tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    >,
    store: &Arc<Store>,
) {
    while let Some(message) = source.next().await {
        match message {
            Ok(Message::Text(text)) => demux::handle_frame(store, &text).await,
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!("worker {worker_id}: upstream closed the connection");
                return;
            }
            Ok(_) => {}
            Err(err) => {
                warn!("worker {worker_id}: read error: {err}");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_stream_list_groups_symbol_contiguously() {
        let symbols = vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()];
        let intervals = [Interval::Min1, Interval::Hour1];
        let streams = build_stream_list(&symbols, &intervals);

        assert_eq!(
            streams,
            vec![
                "btcusdt@ticker",
                "btcusdt@kline_1m",
                "btcusdt@kline_1h",
                "ethusdt@ticker",
                "ethusdt@kline_1m",
                "ethusdt@kline_1h",
            ]
        );
    }

    #[test]
    fn partition_respects_max_streams_per_conn() {
        let streams: Vec<String> = (0..450).map(|i| format!("s{i}")).collect();
        let chunks = partition_streams(&streams);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), MAX_STREAMS_PER_CONN);
        assert_eq!(chunks[1].len(), MAX_STREAMS_PER_CONN);
        assert_eq!(chunks[2].len(), 50);
    }

    #[test]
    fn one_symbols_streams_never_split_across_chunks() {
        // A symbol contributes 1 + intervals.len() contiguous entries; as long as
        // that's <= MAX_STREAMS_PER_CONN, chunking on fixed boundaries cannot
        // separate them from each other when they start at a chunk boundary.
        let symbols: Vec<String> = (0..40).map(|i| format!("SYM{i}USDT")).collect();
        let intervals = Interval::ALL;
        let streams = build_stream_list(&symbols, &intervals);
        let per_symbol = intervals.len() + 1;
        assert_eq!(streams.len(), symbols.len() * per_symbol);
    }
}
