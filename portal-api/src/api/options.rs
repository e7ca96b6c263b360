//! Intake form options endpoint
//!
//! Serves the dropdown contents the intake form needs: organizations,
//! activity types, the occupation -> services mapping and the payment
//! method options, plus today's date for the date pickers.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;

use portal_common::model::PAYMENT_METHODS;

use crate::AppState;

/// GET /api/config response
#[derive(Debug, Serialize)]
pub struct FormOptionsResponse {
    pub organizations: Vec<String>,
    pub activity_types: Vec<String>,
    pub services_by_occupation: HashMap<String, Vec<String>>,
    pub payment_methods: Vec<String>,
    pub today: String,
}

/// GET /api/config
pub async fn get_form_options(State(state): State<AppState>) -> Json<FormOptionsResponse> {
    Json(FormOptionsResponse {
        organizations: state.organizations.as_ref().clone(),
        activity_types: state.catalog.occupations().to_vec(),
        services_by_occupation: state.catalog.service_map().clone(),
        payment_methods: PAYMENT_METHODS.iter().map(|m| m.to_string()).collect(),
        today: Local::now().format("%Y-%m-%d").to_string(),
    })
}
