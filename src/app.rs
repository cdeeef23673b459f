use std::sync::Arc;

use actix_web::web::Data;

use crate::config::Config;
use crate::market::store::Store;

/// Shared application state handed to every route handler: the live store and the
/// resolved configuration (API key, symbol universe).
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<Config>,
}

pub fn new_app_state(store: Arc<Store>, config: Arc<Config>) -> Data<AppState> {
    Data::new(AppState { store, config })
}
