//! Form-field checks shared by every entity form and the CSV importer.
//!
//! Field rules are declared on the forms with `validator`'s derive; the few
//! rules it cannot express (clock times, four digit years, slot ordering)
//! live here.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError};

use crate::error::{field_errors, AppError, FieldError};

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time regex compiles"));

/// Trims a string field and maps blank input to `None`.
pub fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn is_valid_year(year: i32) -> bool {
    (1000..=9999).contains(&year)
}

/// `HH:MM`, 24 hour clock.
pub fn is_valid_time(value: &str) -> bool {
    TIME_RE.is_match(value)
}

/// Custom rule for `#[validate(custom(function = "validate_time"))]`.
pub fn validate_time(value: &str) -> Result<(), ValidationError> {
    if is_valid_time(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("time");
    error.message = Some(Cow::Borrowed("Time must be in HH:MM format."));
    Err(error)
}

/// Runs the derived rules on `form`, adds `extra`, and orders the result by
/// field name. Messages for one field keep their declaration order.
pub fn form_errors<T: Validate>(form: &T, extra: Vec<FieldError>) -> Vec<FieldError> {
    let mut errors = match form.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_errors(&errors),
    };
    errors.extend(extra);
    errors.sort_by(|a, b| a.field.cmp(&b.field));
    errors
}

pub fn ensure_valid(errors: Vec<FieldError>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
