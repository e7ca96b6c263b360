//! Database access layer for portal-api
//!
//! SQLite via sqlx. The schema is created idempotently at startup; a
//! connection failure is not fatal to the service, which then runs with
//! the CSV store only.

use std::path::Path;

use portal_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

mod requests;
pub use requests::*;

/// Open (creating if needed) the portal database
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL keeps concurrent readers off the writer's back
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    Ok(pool)
}

/// Create tables if needed (idempotent, safe to call at every startup)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS service_requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            guid TEXT NOT NULL UNIQUE,
            organization TEXT NOT NULL,
            title TEXT NOT NULL,
            activity_type TEXT NOT NULL DEFAULT '',
            activity_spec TEXT NOT NULL,
            description TEXT NOT NULL,
            other_info TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL,
            number TEXT NOT NULL,
            neighborhood TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            payment_term TEXT NOT NULL,
            expiration_date TEXT NOT NULL,
            execution_deadline TEXT NOT NULL,
            csv_file TEXT,
            created_at TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_service_requests_active
         ON service_requests(active)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS auth_users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            login TEXT NOT NULL UNIQUE,
            secret TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
