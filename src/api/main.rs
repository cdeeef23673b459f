use actix_web::dev::HttpServiceFactory;
use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

use crate::utils::time::unix_seconds;

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy", "time": unix_seconds() }))
}

/// An exact-path resource, not a scope: `/health` must be mounted directly on
/// `App`, never behind an empty-prefix scope, or it would compete with the
/// market scope's own empty prefix for every request (see `register_market_service`).
pub fn register_main_service() -> impl HttpServiceFactory {
    health
}
