// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::poller::TrafficPoller;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) poller: Arc<TrafficPoller>,
    pub(crate) config: AppConfig,
}

pub fn app(poller: Arc<TrafficPoller>, config: AppConfig) -> Router {
    let state = AppState { poller, config };
    Router::new()
        .route("/", get(http::index_handler)) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/traffic", get(http::traffic_handler)) // GET /api/traffic
        .route("/api/interface-name", get(http::interface_name_handler)) // GET /api/interface-name
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
