//! HTTP API handlers for portal-api

pub mod admin;
pub mod auth;
pub mod health;
pub mod options;
pub mod requests;

pub use admin::delete_request;
pub use auth::{check_auth, login, logout, require_admin};
pub use health::health_routes;
pub use options::get_form_options;
pub use requests::{create_request, export_request, get_request, list_requests};
