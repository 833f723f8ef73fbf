// GET handlers: index, version, traffic, interface name

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};

use super::AppState;
use crate::models::{InterfaceNameResponse, RateStatus, TrafficResponse};

/// GET / — short description of the monitored device.
pub(super) async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let device = &state.config.device;
    Html(format!(
        "<h2>SNMP interface traffic monitor</h2>\n\
         <p>Use <code>/api/traffic</code> for traffic rates.</p>\n\
         <p>Configuration: IP={}, Interface={}</p>\n",
        device.address, device.interface_index
    ))
}

/// GET /version — service name and version from Cargo.toml.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/traffic — one poll of the device; 500 when the device could not be read.
pub(super) async fn traffic_handler(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.poller.poll().await;
    let status = match result.status {
        RateStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
        RateStatus::Computed | RateStatus::FirstSample => StatusCode::OK,
    };
    (status, Json(TrafficResponse::from(&result)))
}

/// GET /api/interface-name
pub(super) async fn interface_name_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(InterfaceNameResponse {
        name: state.poller.interface_name().await,
    })
}
