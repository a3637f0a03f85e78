//! SQLite-backed repositories
//!
//! Each collection is one table; rows hold the full document shape with
//! set-valued fields and team sub-records as JSON text. Every call runs under
//! the configured storage deadline.

mod athletes;
mod certificates;
mod teams;

use crate::repository::{StorageHealth, TextQuery};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use sr_common::storage::DEFAULT_STORAGE_TIMEOUT;
use sr_common::{Error, Result};
use std::time::Duration;
use uuid::Uuid;

/// SQLite document store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_timeout(pool, DEFAULT_STORAGE_TIMEOUT)
    }

    /// Store whose every call is bounded by `timeout`
    pub fn with_timeout(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl StorageHealth for SqliteStore {
    async fn ping(&self) -> bool {
        sr_common::db::ping(&self.pool).await
    }
}

/// Stored ids are hyphenated text; empty text is the nil id
fn parse_uuid(raw: &str) -> Result<Uuid> {
    if raw.is_empty() {
        return Ok(Uuid::nil());
    }
    Uuid::parse_str(raw).map_err(|e| Error::Internal(format!("invalid stored id '{}': {}", raw, e)))
}

fn id_text(id: Uuid) -> String {
    if id.is_nil() {
        String::new()
    } else {
        id.to_string()
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn from_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

/// `%text%` with LIKE wildcards escaped (pair with `ESCAPE '\'`)
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Append `AND EXISTS(json set of `column` contains `value`)`
fn push_set_contains(builder: &mut QueryBuilder<'_, Sqlite>, table: &str, column: &str, value: String) {
    builder.push(format!(
        " AND EXISTS (SELECT 1 FROM json_each({}.{}) WHERE json_each.value = ",
        table, column
    ));
    builder.push_bind(value);
    builder.push(")");
}

/// Append the name/alias text clause; `extra_columns` are also matched for
/// broad queries
fn push_text_clause(
    builder: &mut QueryBuilder<'_, Sqlite>,
    table: &str,
    text: &TextQuery,
    extra_columns: &[&str],
) {
    let Some((raw, alias_form)) = text.needles() else {
        return;
    };

    builder.push(" AND (lower(name) LIKE ");
    builder.push_bind(contains_pattern(&raw));
    builder.push(format!(
        " ESCAPE '\\' OR EXISTS (SELECT 1 FROM json_each({}.alias) WHERE lower(json_each.value) LIKE ",
        table
    ));
    builder.push_bind(contains_pattern(&raw));
    builder.push(" ESCAPE '\\' OR lower(json_each.value) LIKE ");
    builder.push_bind(contains_pattern(&alias_form));
    builder.push(" ESCAPE '\\')");

    if text.is_broad() {
        for column in extra_columns {
            builder.push(format!(" OR lower(CAST({} AS TEXT)) LIKE ", column));
            builder.push_bind(contains_pattern(&raw));
            builder.push(" ESCAPE '\\'");
        }
    }

    builder.push(")");
}
