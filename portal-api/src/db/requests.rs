//! Service request queries

use portal_common::model::{ServiceRequest, ServiceRequestRow};
use portal_common::Result;
use sqlx::SqlitePool;

/// Stored admin credential
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub login: String,
    pub secret: String,
}

/// Insert a validated record, returning the autoincrement id
pub async fn insert_request(
    pool: &SqlitePool,
    record: &ServiceRequest,
    csv_file: &str,
    created_at: &str,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO service_requests (
            guid, organization, title, activity_type, activity_spec,
            description, other_info, address, number, neighborhood,
            payment_method, payment_term, expiration_date, execution_deadline,
            csv_file, created_at, active
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)",
    )
    .bind(&record.guid)
    .bind(&record.organization)
    .bind(&record.title)
    .bind(&record.activity_type)
    .bind(&record.activity_spec)
    .bind(&record.description)
    .bind(&record.other_info)
    .bind(&record.address)
    .bind(&record.number)
    .bind(&record.neighborhood)
    .bind(&record.payment_method)
    .bind(&record.payment_term)
    .bind(&record.expiration_date)
    .bind(&record.execution_deadline)
    .bind(csv_file)
    .bind(created_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All active records, newest first
pub async fn list_active(pool: &SqlitePool) -> Result<Vec<ServiceRequestRow>> {
    let rows = sqlx::query_as::<_, ServiceRequestRow>(
        "SELECT * FROM service_requests WHERE active = 1 ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one record by its canonical guid
pub async fn get_by_guid(pool: &SqlitePool, guid: &str) -> Result<Option<ServiceRequestRow>> {
    let row = sqlx::query_as::<_, ServiceRequestRow>(
        "SELECT * FROM service_requests WHERE guid = ?",
    )
    .bind(guid)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Delete a record by guid, returning the removed row so the caller can
/// clean up its derived CSV export. `None` means the guid was unknown.
pub async fn delete_by_guid(pool: &SqlitePool, guid: &str) -> Result<Option<ServiceRequestRow>> {
    let Some(row) = get_by_guid(pool, guid).await? else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM service_requests WHERE guid = ?")
        .bind(guid)
        .execute(pool)
        .await?;

    Ok(Some(row))
}

/// Look up a stored admin credential by login
pub async fn find_auth_user(pool: &SqlitePool, login: &str) -> Result<Option<AuthUser>> {
    let user = sqlx::query_as::<_, AuthUser>(
        "SELECT id, login, secret FROM auth_users WHERE login = ?",
    )
    .bind(login)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Store an admin credential (used by tests and provisioning)
pub async fn upsert_auth_user(pool: &SqlitePool, login: &str, secret: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO auth_users (login, secret) VALUES (?, ?)
         ON CONFLICT(login) DO UPDATE SET secret = excluded.secret",
    )
    .bind(login)
    .bind(secret)
    .execute(pool)
    .await?;

    Ok(())
}
