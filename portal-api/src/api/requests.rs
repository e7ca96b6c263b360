//! Service request intake, listing, lookup and export
//!
//! Creation validates, then persists through the dual pipeline: the
//! database row is authoritative when a database is configured and the
//! CSV file is a derived export whose failure is logged but tolerated.
//! In file-only mode the CSV file is the record of truth and its write
//! must succeed.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use portal_common::model::{NewServiceRequest, ServiceRequest};
use portal_common::slug::record_filename;
use portal_common::validate::validate;

use crate::{db, AppState};

/// POST /api/requests
///
/// Validate a submission and persist it. Responds 201 with the canonical
/// guid, the database id when one was assigned, and the CSV file name.
pub async fn create_request(
    State(state): State<AppState>,
    Json(submission): Json<NewServiceRequest>,
) -> Result<Response, RequestError> {
    let errors = validate(&submission);
    if !errors.is_empty() {
        return Err(RequestError::Validation(errors));
    }

    let guid = Uuid::new_v4().to_string();
    let record = ServiceRequest::from_submission(guid.clone(), submission);
    let now = Local::now();
    let csv_file = record_filename(&record.title, now.naive_local());

    let mut id = None;
    match &state.db {
        Some(pool) => {
            let row_id = db::insert_request(pool, &record, &csv_file, &now.to_rfc3339())
                .await
                .map_err(|e| RequestError::Database(e.to_string()))?;
            id = Some(row_id);
            info!("Service request {} stored as row {}", guid, row_id);

            // Derived export; the row above is the record of truth
            if let Err(e) = state.store.write(&record, &csv_file) {
                warn!("CSV export failed for {}: {}", guid, e);
            }
        }
        None => {
            state
                .store
                .write(&record, &csv_file)
                .map_err(|e| RequestError::Storage(e.to_string()))?;
            info!("Service request {} stored as {}", guid, csv_file);
        }
    }

    let body = Json(json!({
        "message": "Service request created",
        "guid": guid,
        "id": id,
        "csv_file": csv_file,
    }));

    Ok((StatusCode::CREATED, body).into_response())
}

/// GET /api/requests
///
/// Database mode returns full active rows, newest first; file mode
/// returns per-file summaries in sorted filename order.
pub async fn list_requests(State(state): State<AppState>) -> Result<Response, RequestError> {
    match &state.db {
        Some(pool) => {
            let rows = db::list_active(pool)
                .await
                .map_err(|e| RequestError::Database(e.to_string()))?;
            Ok(Json(rows).into_response())
        }
        None => Ok(Json(state.store.list()).into_response()),
    }
}

/// GET /api/requests/:guid
pub async fn get_request(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Response, RequestError> {
    match &state.db {
        Some(pool) => {
            let row = db::get_by_guid(pool, &guid)
                .await
                .map_err(|e| RequestError::Database(e.to_string()))?
                .ok_or(RequestError::NotFound)?;
            Ok(Json(row).into_response())
        }
        None => {
            let (filename, record) = state
                .store
                .find_by_guid(&guid)
                .map_err(|e| RequestError::Storage(e.to_string()))?
                .ok_or(RequestError::NotFound)?;

            let mut body = serde_json::to_value(&record)
                .map_err(|e| RequestError::Storage(e.to_string()))?;
            body["file"] = json!(filename);
            Ok(Json(body).into_response())
        }
    }
}

/// GET /api/requests/:guid/export
///
/// Regenerate the record as a downloadable single-row CSV attachment.
pub async fn export_request(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Response, RequestError> {
    let record = lookup_record(&state, &guid).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .serialize(&record)
        .map_err(|e| RequestError::Storage(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| RequestError::Storage(e.to_string()))?;

    let filename = record_filename(&record.title, Local::now().naive_local());
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Fetch the full record behind `guid` from whichever store is active
pub(crate) async fn lookup_record(
    state: &AppState,
    guid: &str,
) -> Result<ServiceRequest, RequestError> {
    match &state.db {
        Some(pool) => {
            let row = db::get_by_guid(pool, guid)
                .await
                .map_err(|e| RequestError::Database(e.to_string()))?
                .ok_or(RequestError::NotFound)?;
            Ok(row.to_record())
        }
        None => {
            let (_, record) = state
                .store
                .find_by_guid(guid)
                .map_err(|e| RequestError::Storage(e.to_string()))?
                .ok_or(RequestError::NotFound)?;
            Ok(record)
        }
    }
}

/// Service request API errors
#[derive(Debug)]
pub enum RequestError {
    Validation(Vec<String>),
    NotFound,
    Database(String),
    Storage(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self {
            RequestError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            RequestError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Service request not found" })),
            )
                .into_response(),
            RequestError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Database error: {}", msg) })),
            )
                .into_response(),
            RequestError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Storage error: {}", msg) })),
            )
                .into_response(),
        }
    }
}
