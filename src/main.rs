use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use dotenv::dotenv;
use log::info;

use kline_relay::app::new_app_state;
use kline_relay::config::Config;
use kline_relay::market::store::Store;
use kline_relay::{api, exchange, web};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Arc::new(Config::from_env());
    let store = Arc::new(Store::new());

    exchange::pool::spawn_pool(store.clone(), &config);

    let port = config.port;
    let app_state = new_app_state(store, config.clone());

    info!("listening on 0.0.0.0:{port}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(app_state.clone())
            // exact-path resources first: the market scope below has an empty
            // prefix and would otherwise claim these requests before they get here.
            .service(api::main::register_main_service())
            .service(web::market::register_market_ws_service())
            .service(api::market::register_market_service())
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
