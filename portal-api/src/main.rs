//! portal-api - Service Opportunity Portal
//!
//! HTTP service for posting, browsing and administering municipal
//! service requests. Records land in a SQLite database (authoritative)
//! with per-record CSV exports; when the database cannot be opened the
//! service degrades to CSV-only operation rather than refusing to start.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use portal_api::auth::EnvCredentials;
use portal_api::store::CsvStore;
use portal_api::{build_router, db, AppState};
use portal_common::catalog::{load_organizations, OccupationCatalog};
use portal_common::config::Settings;

#[derive(Parser, Debug)]
#[command(name = "portal-api", about = "Service opportunity portal HTTP API")]
struct Args {
    /// Root folder holding records/, refs/ and the database
    #[arg(long)]
    root_folder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Service Opportunity Portal (portal-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let settings = Settings::load(args.root_folder.as_deref())?;
    settings.ensure_directories()?;
    info!("Root folder: {}", settings.root_folder.display());

    // Reference data; the server starts regardless of its state
    let catalog = OccupationCatalog::load(&settings.occupations_csv());
    let organizations = load_organizations(&settings.organizations_csv());
    info!(
        "Loaded {} activity types, {} organizations",
        catalog.occupations().len(),
        organizations.len()
    );

    // Database is optional: a connection failure degrades to CSV-only mode
    let db = match open_database(&settings).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            Some(pool)
        }
        Err(e) => {
            warn!("Database unavailable ({}); running with CSV records only", e);
            None
        }
    };

    let env_credentials = EnvCredentials {
        username: settings.admin_username.clone(),
        password: settings.admin_password.clone(),
        password_hash: settings.admin_password_hash.clone(),
    };

    let state = AppState::new(
        db,
        catalog,
        organizations,
        CsvStore::new(settings.records_dir()),
        env_credentials,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("portal-api listening on http://{}", settings.bind_addr);
    info!("Health check: http://{}/health", settings.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_database(settings: &Settings) -> portal_common::Result<sqlx::SqlitePool> {
    let pool = db::connect(&settings.database_path()).await?;
    db::init_schema(&pool).await?;
    Ok(pool)
}
