//! Field validation for submitted forms.
//!
//! A form either produces its cleaned value or a [`FieldErrors`] list naming
//! every field that failed and why. The license number rule lives here as
//! well because both the driver creation form and the license update form
//! apply it to the same field.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of characters in a license number
pub const LICENSE_NUMBER_LENGTH: usize = 8;

/// Number of leading uppercase letters in a license number
const LICENSE_LETTER_COUNT: usize = 3;

/// Reasons a license number is rejected, in the order they are checked
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseNumberError {
    #[error("license number should consist of 8 characters")]
    Length,
    #[error("first 3 characters should be uppercase letters")]
    Letters,
    #[error("last 5 characters should be digits")]
    Digits,
}

/// Validates a license number: three uppercase ASCII letters followed by
/// five ASCII digits.
///
/// Returns the input unchanged on success. On failure the error names the
/// first rule that was broken, checking length, then letters, then digits.
pub fn validate_license_number(license_number: &str) -> Result<String, LicenseNumberError> {
    let chars: Vec<char> = license_number.chars().collect();

    if chars.len() != LICENSE_NUMBER_LENGTH {
        return Err(LicenseNumberError::Length);
    }

    let (letters, digits) = chars.split_at(LICENSE_LETTER_COUNT);

    if !letters.iter().all(char::is_ascii_uppercase) {
        return Err(LicenseNumberError::Letters);
    }

    if !digits.iter().all(char::is_ascii_digit) {
        return Err(LicenseNumberError::Digits);
    }

    Ok(license_number.to_string())
}

/// A single rejected field and the message shown next to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the form field
    pub field: String,

    /// Human-readable reason
    pub message: String,
}

/// All field errors collected while validating one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error against a field
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Records an error if `field` is blank after trimming
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field is required.");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages recorded against one field
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Appends every error from `other`
    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// Turns the collected errors into the outcome of the submission:
    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
