use actix::{Actor, ActorContext, AsyncContext, Handler, StreamHandler};
use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::market::client::{client_channel, ClientId, ClientReceiver, TickerBroadcast};

/// One downstream WebSocket connection. Registration happens in `ws_index`
/// before the actor is even constructed, so there is no window where the
/// actor can stop (and deregister) before it is registered. Discards every
/// inbound frame (this endpoint is push-only). Outbound ticker pushes arrive
/// via `TickerBroadcast`, forwarded here from a tokio task that drains this
/// client's bounded queue (see `started`).
pub struct ClientConnection {
    id: ClientId,
    receiver: Option<ClientReceiver>,
    app_data: web::Data<AppState>,
}

impl ClientConnection {
    fn new(id: ClientId, receiver: ClientReceiver, app_data: web::Data<AppState>) -> Self {
        Self {
            id,
            receiver: Some(receiver),
            app_data,
        }
    }
}

impl Actor for ClientConnection {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let mut receiver = self.receiver.take().expect("receiver set exactly once in new");
        let addr = ctx.address();

        actix::spawn(async move {
            while let Some(ticker) = receiver.recv().await {
                addr.do_send(TickerBroadcast(ticker));
            }
        });

        info!("client {} connected", self.id);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        let store = self.app_data.store.clone();
        let id = self.id;
        actix::spawn(async move {
            store.remove_client(id).await;
        });
        info!("client {id} disconnected");
    }
}

impl Handler<TickerBroadcast> for ClientConnection {
    type Result = ();

    fn handle(&mut self, msg: TickerBroadcast, ctx: &mut Self::Context) {
        let envelope = json!({ "type": "ticker", "data": msg.0 });
        ctx.text(envelope.to_string());
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ClientConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(bytes)) => ctx.pong(&bytes),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {
                // This endpoint is push-only; any inbound frame is discarded.
            }
            Err(err) => {
                warn!("client {} read error: {err}", self.id);
                ctx.stop();
            }
        }
    }
}

#[get("/ws")]
async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4();
    let (sender, receiver) = client_channel();
    app_data.store.add_client(id, sender).await;

    ws::start(ClientConnection::new(id, receiver, app_data), &req, stream)
}

/// An exact-path resource, not a scope: `/ws` must be mounted directly on
/// `App`, never behind an empty-prefix scope — see `api::market::register_market_service`.
pub fn register_market_ws_service() -> impl HttpServiceFactory {
    ws_index
}
