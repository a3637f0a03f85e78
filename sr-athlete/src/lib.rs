//! sr-athlete library interface
//!
//! Athlete, team and certificate records of swim-meet results, with the
//! import reconcilers used by the meeting feed importers.

pub mod api;
pub mod client;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use repository::{Repositories, StorageHealth};
use services::Services;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Storage ping for the health endpoints
    pub health: Arc<dyn StorageHealth>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(repos: Repositories) -> Self {
        Self {
            services: Services::new(&repos),
            health: repos.health,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::athlete_routes())
        .merge(api::team_routes())
        .merge(api::certificate_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
