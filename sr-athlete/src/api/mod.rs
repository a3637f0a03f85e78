//! HTTP API handlers for sr-athlete

pub mod athletes;
pub mod certificates;
pub mod health;
pub mod params;
pub mod teams;

pub use athletes::athlete_routes;
pub use certificates::certificate_routes;
pub use health::health_routes;
pub use teams::team_routes;
