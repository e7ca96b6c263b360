//! Submission validation
//!
//! Validation collects every problem before responding, so a form with
//! three empty fields gets three messages back rather than one per round
//! trip. An empty error list means the submission passed.

use crate::model::NewServiceRequest;

/// Accepted "no house number" tokens, compared after trim + uppercase
pub const NO_NUMBER_TOKENS: [&str; 5] = ["S/N", "SN", "S.N.", "SEM NUMERO", "SEM NÚMERO"];

/// Validate a submitted service request.
///
/// Returns one human-readable message per failed rule; an empty vector
/// signals a valid submission. `activity_type` and `other_info` are
/// optional and never checked.
pub fn validate(req: &NewServiceRequest) -> Vec<String> {
    let required: [(&str, &str); 11] = [
        (&req.organization, "Organization"),
        (&req.title, "Title"),
        (&req.activity_spec, "Activity specification"),
        (&req.description, "Description"),
        (&req.address, "Address"),
        (&req.number, "Number"),
        (&req.neighborhood, "Neighborhood"),
        (&req.payment_method, "Payment method"),
        (&req.payment_term, "Payment term"),
        (&req.expiration_date, "Expiration date"),
        (&req.execution_deadline, "Execution deadline"),
    ];

    let mut errors = Vec::new();
    for (value, label) in required {
        if value.trim().is_empty() {
            errors.push(format!("{} is required.", label));
        }
    }

    if !req.number.trim().is_empty() && !is_valid_house_number(&req.number) {
        errors.push("Number must be digits only or a no-number token (e.g. S/N).".to_string());
    }

    errors
}

/// Accept an all-digit house number or one of the fixed no-number tokens
pub fn is_valid_house_number(raw: &str) -> bool {
    let normalized = raw.trim().to_uppercase();
    if normalized.is_empty() {
        return false;
    }
    normalized.chars().all(|c| c.is_ascii_digit())
        || NO_NUMBER_TOKENS.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> NewServiceRequest {
        NewServiceRequest {
            organization: "Dept X".into(),
            title: "Fix Fence".into(),
            activity_type: "Construction".into(),
            activity_spec: "Carpenter".into(),
            description: "Repair fence".into(),
            other_info: String::new(),
            address: "Main St".into(),
            number: "S/N".into(),
            neighborhood: "Downtown".into(),
            payment_method: "Cash".into(),
            payment_term: "30 days".into(),
            expiration_date: "2025-12-01".into(),
            execution_deadline: "2025-12-31".into(),
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(validate(&valid_submission()).is_empty());
    }

    #[test]
    fn empty_submission_reports_every_required_field() {
        let errors = validate(&NewServiceRequest::default());
        assert_eq!(errors.len(), 11);
        assert!(errors.iter().any(|e| e.contains("Organization")));
        assert!(errors.iter().any(|e| e.contains("Execution deadline")));
    }

    #[test]
    fn optional_fields_are_not_required() {
        let mut req = valid_submission();
        req.activity_type = String::new();
        req.other_info = String::new();
        assert!(validate(&req).is_empty());
    }

    #[test]
    fn errors_accumulate_instead_of_short_circuiting() {
        let mut req = valid_submission();
        req.title = String::new();
        req.description = String::new();
        req.number = "12-34".into();
        let errors = validate(&req);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn house_numbers_accepted() {
        for ok in ["123", "S/N", "s/n", "SN", "S.N.", "SEM NUMERO", "SEM NÚMERO"] {
            assert!(is_valid_house_number(ok), "expected accept: {ok}");
        }
    }

    #[test]
    fn house_numbers_rejected() {
        for bad in ["123A", "ABC", "12-34", ""] {
            assert!(!is_valid_house_number(bad), "expected reject: {bad}");
        }
    }

    #[test]
    fn invalid_number_gets_specific_message() {
        let mut req = valid_submission();
        req.number = "123A".into();
        let errors = validate(&req);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("digits only"));
    }
}
