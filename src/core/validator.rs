// src/core/validator.rs
//! Required-field rules checked before anything is rendered

use crate::types::ResumeRecord;

pub const FIRST_NAME_REQUIRED: &str = "First name is required.";
pub const LAST_NAME_REQUIRED: &str = "Last name is required.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Email must contain '@'.";
pub const EDUCATION_REQUIRED: &str =
    "At least one education entry with degree and school is required.";
pub const PROJECT_REQUIRED: &str = "At least one project with title and summary is required.";

/// Check the raw, unfiltered record. Every failing rule contributes one
/// message, in rule order; an empty list means the record can be rendered.
pub fn validate(record: &ResumeRecord) -> Vec<String> {
    let mut errors = Vec::new();

    let first_name = record.personal.first_name.trim();
    let last_name = record.personal.last_name.trim();
    let email = record.personal.email.trim();

    if first_name.is_empty() {
        errors.push(FIRST_NAME_REQUIRED.to_string());
    }
    if last_name.is_empty() {
        errors.push(LAST_NAME_REQUIRED.to_string());
    }
    if email.is_empty() {
        errors.push(EMAIL_REQUIRED.to_string());
    } else if !email.contains('@') {
        errors.push(EMAIL_INVALID.to_string());
    }
    if !record.educations.iter().any(|e| e.is_complete()) {
        errors.push(EDUCATION_REQUIRED.to_string());
    }
    if !record.projects.iter().any(|p| p.is_complete()) {
        errors.push(PROJECT_REQUIRED.to_string());
    }

    errors
}
