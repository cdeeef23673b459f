use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::middleware::Next;
use actix_web::web::Data;
use actix_web::{Error, HttpResponse};

use crate::app::AppState;

const API_KEY_HEADER: &str = "X-API-Key";
const BEARER_PREFIX: &str = "Bearer ";

/// Wraps the authenticated data routes. If `API_KEY` is unset or empty, every
/// request passes; otherwise the request must carry a matching `X-API-Key` header
/// or `Authorization: Bearer <key>`.
pub async fn require_api_key(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let configured_key = req
        .app_data::<Data<AppState>>()
        .and_then(|state| state.config.api_key.clone());

    let Some(configured_key) = configured_key else {
        return next.call(req).await.map(ServiceResponse::map_into_boxed_body);
    };

    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            req.headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix(BEARER_PREFIX))
                .map(str::to_string)
        });

    if presented.as_deref() == Some(configured_key.as_str()) {
        next.call(req).await.map(ServiceResponse::map_into_boxed_body)
    } else {
        Ok(req
            .into_response(HttpResponse::Unauthorized().finish())
            .map_into_boxed_body())
    }
}
