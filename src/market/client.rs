use std::sync::Arc;

use actix::Message;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::market::ticker::Ticker;

pub type ClientId = Uuid;

/// Capacity of a single client's outbound ticker queue. Ticker data is latest-wins,
/// so a full queue drops the update rather than blocking the broadcaster.
pub const CLIENT_QUEUE_CAPACITY: usize = 64;

/// Tickers travel as `Arc` from the store outward: one broadcast fans out to
/// every registered client as a refcount bump, not a string-field clone per client.
pub type ClientSender = mpsc::Sender<Arc<Ticker>>;
pub type ClientReceiver = mpsc::Receiver<Arc<Ticker>>;

pub fn client_channel() -> (ClientSender, ClientReceiver) {
    mpsc::channel(CLIENT_QUEUE_CAPACITY)
}

/// Hop from the tokio task draining a client's queue back onto the WebSocket
/// actor's own context, so the actual `ctx.text()` write happens on the actor.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct TickerBroadcast(pub Arc<Ticker>);
