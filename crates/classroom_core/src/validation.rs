//! crates/classroom_core/src/validation.rs
//!
//! Local form checks that run before any request leaves the client.

use crate::domain::{NewAssignment, NewSubmission};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
}

/// Fails when `value` is empty once surrounding whitespace is dropped.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Email is checked before password, so a form with both blank reports the email.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    require("Email", email)?;
    require("Password", password)
}

impl NewAssignment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Title", &self.title)
    }
}

impl NewSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("Answer", &self.answer)
    }
}
