use crate::exchange::ExchangeApi;
use crate::handlers;
use crate::services::Notifier;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub exchange: Arc<dyn ExchangeApi>,
    pub notifier: Arc<dyn Notifier>,
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthcheck/", get(handlers::info::check))
        .route("/bitflyer/ticker", get(handlers::ticker::get_ticker))
        .route("/bitflyer/ticker/", get(handlers::ticker::get_ticker))
        .route("/bitflyer/order/buy", post(handlers::order::buy_order))
        .route("/bitflyer/order/sell", post(handlers::order::sell_order))
        .route("/line/message", post(handlers::line::post_message))
        .layer(cors)
        .with_state(state)
}
