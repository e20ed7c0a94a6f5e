//! Per-party completion scoring and format validation.
//!
//! Completion and validity are independent gates: a party below the
//! completion threshold cannot submit, and a party with any malformed field
//! cannot submit regardless of percentage.

use serde_json::Value;

use crate::workflows::reporting::domain::{FieldError, PartyData, PartyEntityType};

/// Minimum completion percentage before a party may submit.
pub const MIN_SUBMISSION_COMPLETION: u8 = 70;

/// One entry in an entity type's required-field checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub key: &'static str,
    pub label: &'static str,
}

const INDIVIDUAL_FIELDS: &[RequiredField] = &[
    RequiredField {
        key: "legal_name",
        label: "Legal name",
    },
    RequiredField {
        key: "date_of_birth",
        label: "Date of birth",
    },
    RequiredField {
        key: "residential_address",
        label: "Residential address",
    },
    RequiredField {
        key: "contact_email",
        label: "Contact e-mail",
    },
];

const ENTITY_FIELDS: &[RequiredField] = &[
    RequiredField {
        key: "legal_name",
        label: "Legal name",
    },
    RequiredField {
        key: "ein",
        label: "Employer identification number",
    },
    RequiredField {
        key: "formation_state",
        label: "State of formation",
    },
    RequiredField {
        key: "authorized_signer",
        label: "Authorized signer",
    },
];

const TRUST_FIELDS: &[RequiredField] = &[
    RequiredField {
        key: "trust_name",
        label: "Trust name",
    },
    RequiredField {
        key: "trust_type",
        label: "Trust type",
    },
    RequiredField {
        key: "execution_date",
        label: "Execution date",
    },
    RequiredField {
        key: "trustee_name",
        label: "Trustee name",
    },
];

/// The required-field checklist for an entity type. Kept as a single lookup
/// so the rules stay centrally auditable.
pub fn required_fields(entity_type: PartyEntityType) -> &'static [RequiredField] {
    match entity_type {
        PartyEntityType::Individual => INDIVIDUAL_FIELDS,
        PartyEntityType::Entity => ENTITY_FIELDS,
        PartyEntityType::Trust => TRUST_FIELDS,
    }
}

/// Result of scoring a party's submitted data.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionAssessment {
    pub completion_percentage: u8,
    pub validation_errors: Vec<FieldError>,
}

impl CompletionAssessment {
    pub fn has_validation_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    pub fn may_submit(&self) -> bool {
        self.completion_percentage >= MIN_SUBMISSION_COMPLETION && !self.has_validation_errors()
    }
}

/// Score a party's data against its checklist and format rules.
pub fn assess(entity_type: PartyEntityType, data: &PartyData) -> CompletionAssessment {
    let checklist = required_fields(entity_type);
    let filled = checklist
        .iter()
        .filter(|field| data.get(field.key).map(is_filled).unwrap_or(false))
        .count();

    let completion_percentage =
        ((filled as f64 / checklist.len() as f64) * 100.0).round() as u8;

    let mut validation_errors = Vec::new();
    for (key, value) in data {
        if !is_filled(value) {
            continue;
        }
        if let Some(message) = format_error(key, value) {
            validation_errors.push(FieldError {
                field: key.clone(),
                message,
            });
        }
    }

    CompletionAssessment {
        completion_percentage,
        validation_errors,
    }
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Format checks for known keys. A value may be present but malformed; this
/// is what separates validation errors from incompleteness.
fn format_error(key: &str, value: &Value) -> Option<String> {
    match key {
        "ein" => match value.as_str() {
            Some(raw) if is_valid_ein(raw) => None,
            Some(_) => Some("EIN must match NN-NNNNNNN".to_string()),
            None => Some("EIN must be provided as text".to_string()),
        },
        "date_of_birth" | "execution_date" => match value.as_str() {
            Some(raw) if chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").is_ok() => None,
            _ => Some("date must be formatted YYYY-MM-DD".to_string()),
        },
        "contact_email" => match value.as_str() {
            Some(raw) if is_plausible_email(raw) => None,
            _ => Some("e-mail address is not deliverable".to_string()),
        },
        "ownership_percentage" => match value.as_f64() {
            Some(percent) if percent > 0.0 && percent <= 100.0 => None,
            _ => Some("ownership percentage must be between 0 and 100".to_string()),
        },
        _ => None,
    }
}

fn is_valid_ein(raw: &str) -> bool {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2] == b'-'
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

fn is_plausible_email(raw: &str) -> bool {
    let raw = raw.trim();
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
