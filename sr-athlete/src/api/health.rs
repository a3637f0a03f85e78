//! Health endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Plain-text state served on /actuator
pub const OPERATIONAL: &str = "OPERATIONAL";
pub const DATABASE_DISCONNECTED: &str = "DATABASE_DISCONNECTED";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: String,
    /// Module name ("sr-athlete")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    pub database: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;
    let connected = state.health.ping().await;

    Json(HealthResponse {
        status: if connected { "ok" } else { "degraded" }.to_string(),
        module: "sr-athlete".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    })
}

/// GET /actuator
///
/// Always 200; the state is the body.
pub async fn actuator(State(state): State<AppState>) -> &'static str {
    if state.health.ping().await {
        OPERATIONAL
    } else {
        DATABASE_DISCONNECTED
    }
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/actuator", get(actuator))
}
