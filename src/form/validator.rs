// Per-step validation - pure functions, no side effects

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::form::types::{Field, FormFields, Step};

/// Ordered error map produced by a validation pass. Empty map means the step
/// is valid.
pub type ValidationErrors = BTreeMap<Field, String>;

pub const MSG_NAME_REQUIRED: &str = "Name is required";
pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_EMAIL_INVALID: &str = "Email is invalid";
pub const MSG_PROJECT_TYPE_REQUIRED: &str = "Project type is required";
pub const MSG_BUDGET_REQUIRED: &str = "Budget is required";
pub const MSG_TIMELINE_REQUIRED: &str = "Timeline is required";
pub const MSG_DESCRIPTION_REQUIRED: &str = "Project description is required";
pub const MSG_CAPTCHA_REQUIRED: &str = "Please complete the security verification";

// Basic local@domain.tld shape; full RFC validation is the provider's job.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Whether a value matches the basic `local@domain.tld` email shape.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Validate the fields relevant to one step. Pure: errors for other steps are
/// never touched here; optimistic clearing happens in the state machine.
pub fn validate_step(step: Step, fields: &FormFields) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match step {
        Step::Basics => {
            if fields.name.trim().is_empty() {
                errors.insert(Field::Name, MSG_NAME_REQUIRED.to_string());
            }
            if fields.email.trim().is_empty() {
                errors.insert(Field::Email, MSG_EMAIL_REQUIRED.to_string());
            } else if !is_valid_email(fields.email.trim()) {
                errors.insert(Field::Email, MSG_EMAIL_INVALID.to_string());
            }
        }
        Step::Project => {
            if fields.project_type.trim().is_empty() {
                errors.insert(Field::ProjectType, MSG_PROJECT_TYPE_REQUIRED.to_string());
            }
            if fields.budget.trim().is_empty() {
                errors.insert(Field::Budget, MSG_BUDGET_REQUIRED.to_string());
            }
            if fields.timeline.trim().is_empty() {
                errors.insert(Field::Timeline, MSG_TIMELINE_REQUIRED.to_string());
            }
            if fields.description.trim().is_empty() {
                errors.insert(Field::Description, MSG_DESCRIPTION_REQUIRED.to_string());
            }
        }
        // No required fields; the captcha is checked at submit time, not here.
        Step::Requirements | Step::Review => {}
    }
    errors
}
