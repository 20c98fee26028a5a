//! Validation for new subscriber submissions.

use crate::CoreError;

/// A validated subscriber submission, ready to be inserted into the store.
///
/// All fields are trimmed and guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: String,
    pub keywords: String,
    pub location: String,
}

impl NewSubscriber {
    /// Validates a raw submission.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BlankField`] if any field is empty after trimming,
    /// or [`CoreError::InvalidEmail`] if the email has no `local@domain` shape.
    pub fn new(email: &str, keywords: &str, location: &str) -> Result<Self, CoreError> {
        let email = require("email", email)?;
        let keywords = require("keywords", keywords)?;
        let location = require("location", location)?;

        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(CoreError::InvalidEmail(email)),
        }

        Ok(Self {
            email,
            keywords,
            location,
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::BlankField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
