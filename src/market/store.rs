use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use tokio::sync::RwLock;

use crate::market::client::{ClientId, ClientSender};
use crate::market::interval::Interval;
use crate::market::kline::Kline;
use crate::market::ring::KlineRing;
use crate::market::ticker::Ticker;

/// Per-series ring capacity. Fixed by the wire contract, not configurable.
pub const KLINE_RING_CAPACITY: usize = 500;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct SeriesKey {
    symbol: String,
    interval: Interval,
}

/// Sole keeper of all live state: kline rings, the latest-ticker map, and the set
/// of connected downstream clients.
///
/// Two disjoint locks guard disjoint data: `data` (rings + ticker map) and
/// `clients` (the registry used for broadcast fan-out). Keeping them separate means
/// a slow client write never stalls `put_kline`/`put_ticker` on the ingest path.
pub struct Store {
    data: RwLock<StoreData>,
    clients: RwLock<HashMap<ClientId, ClientSender>>,
}

#[derive(Default)]
struct StoreData {
    rings: HashMap<SeriesKey, KlineRing>,
    tickers: HashMap<String, Ticker>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Appends a closed kline to its series ring. In-progress (not yet closed)
    /// candles are dropped here — only finalized candles enter history.
    pub async fn put_kline(&self, symbol: &str, interval: Interval, kline: Kline) {
        if !kline.is_closed {
            return;
        }

        let key = SeriesKey {
            symbol: symbol.to_string(),
            interval,
        };

        let mut data = self.data.write().await;
        data.rings
            .entry(key)
            .or_insert_with(|| KlineRing::new(KLINE_RING_CAPACITY))
            .push(kline);
    }

    /// Replaces the latest ticker for its symbol, then fans the update out to every
    /// currently-registered client. A client whose queue is full simply misses this
    /// update — tickers are latest-wins, so a drop is never a correctness issue.
    /// The broadcast copy is `Arc`-wrapped once here, so fan-out to N clients is
    /// N refcount bumps rather than N deep clones of the ticker's string fields.
    pub async fn put_ticker(&self, ticker: Ticker) {
        let broadcast = Arc::new(ticker.clone());

        {
            let mut data = self.data.write().await;
            data.tickers.insert(ticker.symbol.clone(), ticker);
        }

        let clients = self.clients.read().await;
        for (id, sender) in clients.iter() {
            if let Err(err) = sender.try_send(broadcast.clone()) {
                warn!("dropping ticker broadcast to client {id}: {err}");
            }
        }
    }

    /// Returns up to `limit` klines for the series, oldest first. Empty if the
    /// series has never been seen or has no history yet.
    pub async fn get_klines(&self, symbol: &str, interval: Interval, limit: usize) -> Vec<Kline> {
        let key = SeriesKey {
            symbol: symbol.to_string(),
            interval,
        };
        let data = self.data.read().await;
        data.rings
            .get(&key)
            .map(|ring| ring.last(limit))
            .unwrap_or_default()
    }

    pub async fn get_ticker(&self, symbol: &str) -> Option<Ticker> {
        let data = self.data.read().await;
        data.tickers.get(symbol).cloned()
    }

    /// A copy of the full ticker map, safe to walk without holding any lock.
    pub async fn get_all_tickers(&self) -> HashMap<String, Ticker> {
        let data = self.data.read().await;
        data.tickers.clone()
    }

    pub async fn add_client(&self, id: ClientId, sender: ClientSender) {
        self.clients.write().await.insert(id, sender);
    }

    pub async fn remove_client(&self, id: ClientId) {
        self.clients.write().await.remove(&id);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kline(open_time: u64, is_closed: bool) -> Kline {
        Kline {
            open_time,
            open: "1".into(),
            high: "1".into(),
            low: "1".into(),
            close: "1".into(),
            volume: "1".into(),
            close_time: open_time + 59_999,
            quote_volume: "1".into(),
            trades: 1,
            taker_buy_base_volume: "1".into(),
            taker_buy_quote_volume: "1".into(),
            is_closed,
        }
    }

    fn ticker(symbol: &str) -> Ticker {
        Ticker {
            symbol: symbol.to_string(),
            price: "100.0".into(),
            volume: "1.0".into(),
            quote_volume: "100.0".into(),
            price_change_percent: "0.0".into(),
            high: "101.0".into(),
            low: "99.0".into(),
            update_time: 1,
        }
    }

    #[tokio::test]
    async fn put_kline_ignores_in_progress_candles() {
        let store = Store::new();
        store.put_kline("BTCUSDT", Interval::Min1, kline(1, false)).await;
        assert!(store.get_klines("BTCUSDT", Interval::Min1, 10).await.is_empty());
    }

    #[tokio::test]
    async fn put_kline_then_get_klines_round_trips() {
        let store = Store::new();
        store.put_kline("BTCUSDT", Interval::Min1, kline(1, true)).await;
        store.put_kline("BTCUSDT", Interval::Min1, kline(2, true)).await;

        let klines = store.get_klines("BTCUSDT", Interval::Min1, 10).await;
        assert_eq!(klines.len(), 2);
        assert_eq!(klines[0].open_time, 1);
    }

    #[tokio::test]
    async fn distinct_series_are_independent() {
        let store = Store::new();
        store.put_kline("BTCUSDT", Interval::Min1, kline(1, true)).await;
        store.put_kline("BTCUSDT", Interval::Min5, kline(1, true)).await;
        store.put_kline("ETHUSDT", Interval::Min1, kline(1, true)).await;

        assert_eq!(store.get_klines("BTCUSDT", Interval::Min1, 10).await.len(), 1);
        assert_eq!(store.get_klines("BTCUSDT", Interval::Min5, 10).await.len(), 1);
        assert_eq!(store.get_klines("ETHUSDT", Interval::Min1, 10).await.len(), 1);
    }

    #[tokio::test]
    async fn get_klines_on_unknown_series_is_empty() {
        let store = Store::new();
        assert!(store.get_klines("DOGEUSDT", Interval::Hour1, 10).await.is_empty());
    }

    #[tokio::test]
    async fn put_ticker_overwrites_and_reads_back() {
        let store = Store::new();
        store.put_ticker(ticker("BTCUSDT")).await;
        let mut updated = ticker("BTCUSDT");
        updated.price = "200.0".into();
        store.put_ticker(updated).await;

        let t = store.get_ticker("BTCUSDT").await.unwrap();
        assert_eq!(t.price, "200.0");
    }

    #[tokio::test]
    async fn get_ticker_absent_is_none() {
        let store = Store::new();
        assert!(store.get_ticker("BTCUSDT").await.is_none());
    }

    #[tokio::test]
    async fn get_all_tickers_is_a_copy() {
        let store = Store::new();
        store.put_ticker(ticker("BTCUSDT")).await;
        store.put_ticker(ticker("ETHUSDT")).await;

        let snapshot = store.get_all_tickers().await;
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key("BTCUSDT"));
        assert!(snapshot.contains_key("ETHUSDT"));
    }

    #[tokio::test]
    async fn put_ticker_delivers_to_registered_clients() {
        let store = Store::new();
        let (tx, mut rx) = crate::market::client::client_channel();
        store.add_client(ClientId::new_v4(), tx).await;

        store.put_ticker(ticker("BTCUSDT")).await;

        let received = rx.try_recv().unwrap();
        assert_eq!(received.symbol, "BTCUSDT");
    }

    #[tokio::test]
    async fn removed_client_receives_nothing_further() {
        let store = Store::new();
        let id = ClientId::new_v4();
        let (tx, mut rx) = crate::market::client::client_channel();
        store.add_client(id, tx).await;
        store.remove_client(id).await;

        store.put_ticker(ticker("BTCUSDT")).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_client_queue_drops_without_erroring() {
        let store = Store::new();
        let (tx, _rx) = crate::market::client::client_channel();
        store.add_client(ClientId::new_v4(), tx).await;

        for _ in 0..(crate::market::client::CLIENT_QUEUE_CAPACITY + 10) {
            store.put_ticker(ticker("BTCUSDT")).await;
        }
        // no panic, no deadlock: drop-on-full is silent
    }
}
