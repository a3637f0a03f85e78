//! Database initialization
//!
//! One table per collection. Rows hold the full document shape; set-valued
//! fields and opaque sub-records are JSON text columns.

use crate::storage::{with_deadline, PING_TIMEOUT};
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// How long a connection waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the database file and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    debug!("Connecting to database: {}", db_path.display());

    // Applied to every pooled connection; WAL lets readers proceed while an import writes
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_tables(&pool).await?;

    Ok(pool)
}

/// Private in-memory database (tests, throwaway runs)
///
/// Pinned to a single connection that never expires; every new connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create the athlete, team and certificate tables (idempotent)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teams (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            alias TEXT NOT NULL DEFAULT '[]',
            country TEXT NOT NULL DEFAULT '',
            dsv_id INTEGER NOT NULL DEFAULT 0,
            state_id INTEGER NOT NULL DEFAULT 0,
            address TEXT NOT NULL DEFAULT '{}',
            contact TEXT NOT NULL DEFAULT '{}',
            website TEXT NOT NULL DEFAULT '',
            logo_url TEXT NOT NULL DEFAULT '',
            color_set TEXT NOT NULL DEFAULT '{}',
            first_meeting TEXT NOT NULL DEFAULT '',
            participation TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS athletes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            firstname TEXT NOT NULL DEFAULT '',
            lastname TEXT NOT NULL DEFAULT '',
            year INTEGER NOT NULL DEFAULT 0,
            dsv_id INTEGER NOT NULL DEFAULT 0,
            gender TEXT NOT NULL DEFAULT '',
            alias TEXT NOT NULL DEFAULT '[]',
            team_id TEXT NOT NULL DEFAULT '',
            first_meeting TEXT NOT NULL DEFAULT '',
            participation TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS certificates (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            athlete_id TEXT NOT NULL DEFAULT '',
            meeting TEXT NOT NULL DEFAULT '',
            path TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL DEFAULT '',
            hidden INTEGER NOT NULL DEFAULT 0,
            downloads INTEGER NOT NULL DEFAULT 0,
            ordering INTEGER NOT NULL DEFAULT 0,
            added_at TEXT,
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Lookup keys used by the import reconcilers
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_athletes_dsv_id ON athletes(dsv_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_athletes_year ON athletes(year)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_athletes_team_id ON athletes(team_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_teams_dsv_id ON teams(dsv_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_certificates_athlete ON certificates(athlete_id, meeting)")
        .execute(pool)
        .await?;

    info!("Database tables initialized (athletes, teams, certificates)");

    Ok(())
}

/// Storage ping for health checks; false on error or after [`PING_TIMEOUT`]
pub async fn ping(pool: &SqlitePool) -> bool {
    with_deadline("ping", PING_TIMEOUT, async {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    })
    .await
    .is_ok()
}
