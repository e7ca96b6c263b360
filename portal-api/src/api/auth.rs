//! Login, logout, session check and the admin gate
//!
//! The session token travels in an HttpOnly cookie and resolves against
//! the in-process session store. State-mutating admin routes sit behind
//! `require_admin`; a request without a resolvable session is rejected
//! with 401 before the handler runs.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{authenticate, Session};
use crate::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "portal_session";

/// Login request body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let identity = authenticate(&state.credential_sources(), username, &body.password)
        .await
        .ok_or(AuthError::InvalidCredentials)?;

    let token = state.sessions.create(&identity);

    let mut response = Json(json!({
        "message": "Login successful",
        "user": { "id": identity.id, "username": identity.username },
    }))
    .into_response();

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    );
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AuthError::Internal(e.to_string()))?,
    );

    Ok(response)
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }

    let mut response = Json(json!({ "message": "Logout successful" })).into_response();
    let expired = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    if let Ok(value) = HeaderValue::from_str(&expired) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

/// GET /api/auth/check
pub async fn check_auth(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    match current_session(&state, &headers) {
        Some(session) => Json(json!({
            "authenticated": true,
            "user": { "id": session.user_id, "username": session.username },
        })),
        None => Json(json!({ "authenticated": false })),
    }
}

/// Middleware guarding admin routes
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if current_session(&state, request.headers()).is_none() {
        return Err(AuthError::NotAuthorized);
    }
    Ok(next.run(request).await)
}

/// Resolve the request's session cookie to a live session
pub fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let token = session_token(headers)?;
    state.sessions.get(&token)
}

/// Extract the session token from the Cookie header
fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    InvalidCredentials,
    NotAuthorized,
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "Username and password are required".to_string(),
            ),
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            AuthError::NotAuthorized => (StatusCode::UNAUTHORIZED, "Not authorized".to_string()),
            AuthError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Authentication error: {}", msg),
            ),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
