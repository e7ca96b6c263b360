//! Admin-only deletion
//!
//! Runs behind the `require_admin` middleware. Deleting removes the
//! authoritative database row and then best-effort removes the derived
//! CSV export; in file-only mode the file removal is the deletion.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use crate::api::requests::RequestError;
use crate::{db, AppState};

/// DELETE /api/admin/requests/:guid
pub async fn delete_request(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> Result<Json<serde_json::Value>, RequestError> {
    match &state.db {
        Some(pool) => {
            let row = db::delete_by_guid(pool, &guid)
                .await
                .map_err(|e| RequestError::Database(e.to_string()))?
                .ok_or(RequestError::NotFound)?;

            // The export is derived; failing to remove it is not fatal
            if let Some(csv_file) = row.csv_file {
                if let Err(e) = state.store.remove(&csv_file) {
                    warn!("Could not remove CSV export {}: {}", csv_file, e);
                }
            }
        }
        None => {
            let (filename, _) = state
                .store
                .find_by_guid(&guid)
                .map_err(|e| RequestError::Storage(e.to_string()))?
                .ok_or(RequestError::NotFound)?;

            state
                .store
                .remove(&filename)
                .map_err(|e| RequestError::Storage(e.to_string()))?;
        }
    }

    info!("Service request {} deleted", guid);
    Ok(Json(json!({ "message": "Service request deleted" })))
}
