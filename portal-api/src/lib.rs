//! portal-api library - Service Opportunity Portal HTTP service
//!
//! Intake, listing and admin deletion of municipal service requests,
//! persisted to a SQLite database (authoritative, when configured) with
//! per-record CSV exports as a derived artifact.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use portal_common::catalog::OccupationCatalog;

use crate::auth::{CredentialSource, EnvCredentials, SessionStore};
use crate::store::CsvStore;

pub mod api;
pub mod auth;
pub mod db;
pub mod store;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database pool; `None` runs the portal in file-only mode
    pub db: Option<SqlitePool>,
    /// Occupation -> services reference data, immutable after startup
    pub catalog: Arc<OccupationCatalog>,
    /// Requesting organizations, sorted, immutable after startup
    pub organizations: Arc<Vec<String>>,
    /// Per-record CSV store
    pub store: CsvStore,
    /// Server-side admin sessions
    pub sessions: SessionStore,
    /// Environment-configured credential fallback
    pub env_credentials: EnvCredentials,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: Option<SqlitePool>,
        catalog: OccupationCatalog,
        organizations: Vec<String>,
        store: CsvStore,
        env_credentials: EnvCredentials,
    ) -> Self {
        Self {
            db,
            catalog: Arc::new(catalog),
            organizations: Arc::new(organizations),
            store,
            sessions: SessionStore::new(),
            env_credentials,
        }
    }

    /// Credential backends in verification priority order: database first,
    /// environment fallback second.
    pub fn credential_sources(&self) -> Vec<CredentialSource> {
        let mut sources = Vec::new();
        if let Some(pool) = &self.db {
            sources.push(CredentialSource::Database(pool.clone()));
        }
        sources.push(CredentialSource::Environment(self.env_credentials.clone()));
        sources
    }
}

/// Build application router
///
/// Admin routes sit behind the session middleware; everything else is
/// public, including the health endpoint.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, post};
    use tower_http::trace::TraceLayer;

    // Admin routes (require an authenticated session)
    let admin = Router::new()
        .route("/api/admin/requests/:guid", delete(api::delete_request))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_admin,
        ));

    // Public routes
    let public = Router::new()
        .route("/api/config", get(api::get_form_options))
        .route(
            "/api/requests",
            get(api::list_requests).post(api::create_request),
        )
        .route("/api/requests/:guid", get(api::get_request))
        .route("/api/requests/:guid/export", get(api::export_request))
        .route("/api/auth/login", post(api::login))
        .route("/api/auth/logout", post(api::logout))
        .route("/api/auth/check", get(api::check_auth))
        .merge(api::health_routes());

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
