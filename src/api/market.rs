use actix_web::{get, middleware::from_fn, web, HttpResponse, Responder, Scope};
use serde::Deserialize;
use serde_json::json;

use crate::api::auth::require_api_key;
use crate::app::AppState;
use crate::market::interval::Interval;

const DEFAULT_KLINE_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
struct KlinePath {
    symbol: String,
    interval: String,
}

#[derive(Debug, Deserialize)]
struct KlineQuery {
    limit: Option<usize>,
}

#[get("/klines/{symbol}/{interval}")]
async fn get_klines(
    app_data: web::Data<AppState>,
    path: web::Path<KlinePath>,
    query: web::Query<KlineQuery>,
) -> impl Responder {
    let symbol = path.symbol.to_uppercase();

    let Ok(interval) = Interval::try_from(path.interval.as_str()) else {
        return HttpResponse::BadRequest().body("Unknown interval");
    };

    let limit = query.limit.unwrap_or(DEFAULT_KLINE_LIMIT).min(DEFAULT_KLINE_LIMIT);
    let klines = app_data.store.get_klines(&symbol, interval, limit).await;

    HttpResponse::Ok().json(json!({
        "symbol": symbol,
        "interval": interval.to_string(),
        "count": klines.len(),
        "klines": klines,
    }))
}

#[get("/ticker/{symbol}")]
async fn get_ticker(app_data: web::Data<AppState>, symbol: web::Path<String>) -> impl Responder {
    let symbol = symbol.to_uppercase();

    match app_data.store.get_ticker(&symbol).await {
        Some(ticker) => HttpResponse::Ok().json(ticker),
        None => HttpResponse::NotFound().body("Symbol not found"),
    }
}

#[get("/tickers")]
async fn get_tickers(app_data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(app_data.store.get_all_tickers().await)
}

/// The one empty-prefix scope in the app: its "" guard matches every path, so it
/// must be the *last* service registered on `App` — `/health` and `/ws` are
/// mounted as exact-path resources ahead of it and claim their own requests
/// first. Registered before them, this scope would swallow every request and
/// answer with its own 404 before the other services ever saw it.
pub fn register_market_service() -> Scope {
    web::scope("")
        .wrap(from_fn(require_api_key))
        .service(get_klines)
        .service(get_ticker)
        .service(get_tickers)
}
