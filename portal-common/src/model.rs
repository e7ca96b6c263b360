//! Record model for service opportunity postings

use serde::{Deserialize, Serialize};

/// Payment method options offered by the intake form
pub const PAYMENT_METHODS: [&str; 4] = ["Check", "Cash", "Card", "Transfer"];

/// A submitted service request, exactly as received from the intake form.
///
/// All fields default to empty strings so that a body with missing keys
/// still deserializes; the validator reports every missing field at once
/// instead of the decoder rejecting the first one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewServiceRequest {
    pub organization: String,
    pub title: String,
    pub activity_type: String,
    pub activity_spec: String,
    pub description: String,
    pub other_info: String,
    pub address: String,
    pub number: String,
    pub neighborhood: String,
    pub payment_method: String,
    pub payment_term: String,
    pub expiration_date: String,
    pub execution_deadline: String,
}

/// A persisted service request record.
///
/// The `guid` is the canonical identity, assigned once at creation and
/// stored in both the CSV file and the database row. Field order here is
/// the CSV column order; the csv writer derives the header from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub guid: String,
    pub organization: String,
    pub title: String,
    pub activity_type: String,
    pub activity_spec: String,
    pub description: String,
    pub other_info: String,
    pub address: String,
    pub number: String,
    pub neighborhood: String,
    pub payment_method: String,
    pub payment_term: String,
    pub expiration_date: String,
    pub execution_deadline: String,
}

impl ServiceRequest {
    /// Build a persistable record from a validated submission
    pub fn from_submission(guid: String, new: NewServiceRequest) -> Self {
        Self {
            guid,
            organization: new.organization,
            title: new.title,
            activity_type: new.activity_type,
            activity_spec: new.activity_spec,
            description: new.description,
            other_info: new.other_info,
            address: new.address,
            number: new.number,
            neighborhood: new.neighborhood,
            payment_method: new.payment_method,
            payment_term: new.payment_term,
            expiration_date: new.expiration_date,
            execution_deadline: new.execution_deadline,
        }
    }
}

/// A service request row as stored in the database.
///
/// `id` is the autoincrement key kept for ordering; lookups go through
/// `guid`. `csv_file` records the derived CSV export, when one was written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ServiceRequestRow {
    pub id: i64,
    pub guid: String,
    pub organization: String,
    pub title: String,
    pub activity_type: String,
    pub activity_spec: String,
    pub description: String,
    pub other_info: String,
    pub address: String,
    pub number: String,
    pub neighborhood: String,
    pub payment_method: String,
    pub payment_term: String,
    pub expiration_date: String,
    pub execution_deadline: String,
    pub csv_file: Option<String>,
    pub created_at: String,
    pub active: bool,
}

impl ServiceRequestRow {
    /// Project the row back into the CSV record shape (for export)
    pub fn to_record(&self) -> ServiceRequest {
        ServiceRequest {
            guid: self.guid.clone(),
            organization: self.organization.clone(),
            title: self.title.clone(),
            activity_type: self.activity_type.clone(),
            activity_spec: self.activity_spec.clone(),
            description: self.description.clone(),
            other_info: self.other_info.clone(),
            address: self.address.clone(),
            number: self.number.clone(),
            neighborhood: self.neighborhood.clone(),
            payment_method: self.payment_method.clone(),
            payment_term: self.payment_term.clone(),
            expiration_date: self.expiration_date.clone(),
            execution_deadline: self.execution_deadline.clone(),
        }
    }
}

/// Listing projection used by the public and admin views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequestSummary {
    pub guid: String,
    /// Backing CSV file name (file mode only)
    pub file: Option<String>,
    pub title: String,
    pub activity_type: String,
    pub neighborhood: String,
    pub expiration_date: String,
}

impl From<&ServiceRequest> for ServiceRequestSummary {
    fn from(record: &ServiceRequest) -> Self {
        Self {
            guid: record.guid.clone(),
            file: None,
            title: record.title.clone(),
            activity_type: record.activity_type.clone(),
            neighborhood: record.neighborhood.clone(),
            expiration_date: record.expiration_date.clone(),
        }
    }
}
