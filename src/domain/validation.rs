//! Validation rules for the registration form.
//!
//! Every rule is checked independently so a single submit reports all the
//! fields that need fixing. The duplicate-email rule runs last and replaces
//! whatever message the email field already had.
//!
//! Blank checks look at trimmed values; the email format and duplicate checks
//! look at the email exactly as typed, so surrounding spaces make it invalid.

use super::errors::{Field, ValidationErrors};
use super::models::{Candidate, UserRecord};
use regex::Regex;
use std::sync::LazyLock;

pub const NAME_REQUIRED: &str = "Nombre obligatorio";
pub const EMAIL_REQUIRED: &str = "Email obligatorio";
pub const EMAIL_INVALID: &str = "Email inválido";
pub const PHONE_REQUIRED: &str = "Teléfono obligatorio";
pub const EMAIL_TAKEN: &str = "Ya existe un usuario con este email";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern is valid")
});

/// Returns true when `email` looks like `local@domain.tld`.
///
/// Only ASCII addresses are accepted and the suffix after the last dot must be
/// at least two characters long.
///
/// # Examples
///
/// ```
/// use primera_pagina::domain::is_valid_email;
///
/// assert!(is_valid_email("ana@example.com"));
/// assert!(!is_valid_email("bad-email"));
/// assert!(!is_valid_email("ana@example.c"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    email.is_ascii() && EMAIL_PATTERN.is_match(email)
}

/// Checks a candidate against the field rules and the existing records.
///
/// # Examples
///
/// ```
/// use primera_pagina::domain::{validate, Candidate, Field};
///
/// let errors = validate(&Candidate::new("", "a@b.co", "123"), &[]);
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.get(Field::Name), Some("Nombre obligatorio"));
/// ```
pub fn validate(candidate: &Candidate, existing: &[UserRecord]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let email = candidate.email.as_str();

    if candidate.name.trim().is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    }

    if email.trim().is_empty() {
        errors.insert(Field::Email, EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        errors.insert(Field::Email, EMAIL_INVALID);
    }

    if candidate.phone.trim().is_empty() {
        errors.insert(Field::Phone, PHONE_REQUIRED);
    }

    if !email.trim().is_empty() && email_taken(email, existing) {
        errors.insert(Field::Email, EMAIL_TAKEN);
    }

    errors
}

fn email_taken(email: &str, existing: &[UserRecord]) -> bool {
    let email = email.to_lowercase();
    existing
        .iter()
        .any(|record| record.email.to_lowercase() == email)
}
