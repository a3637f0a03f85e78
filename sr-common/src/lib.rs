//! # SwimResults Common Library
//!
//! Shared code for the SwimResults services including:
//! - Error type used across storage and service layers
//! - Configuration loading (CLI > ENV > TOML > defaults)
//! - Identity normalization (alias keys, "Last, First" name splitting)
//! - Storage deadlines
//! - SQLite database initialization

pub mod alias;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod storage;

pub use alias::{normalize, split_name, SplitName};
pub use error::{Error, Result};
