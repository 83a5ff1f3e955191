//! Loan identifier validation.
//!
//! Route parameters arrive as raw strings and sometimes carry a leading `:`
//! left over from the route pattern. Validation happens before any network
//! call is made.

use std::fmt;

/// Validation error with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Error for a loan id that is missing, zero or not a number.
    pub fn invalid_loan_id(raw: &str) -> Self {
        Self::new("loanId", format!("Invalid loan ID: {}", raw))
            .with_suggestion("Open the document from the loan list so the id is filled in")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Parse a route-supplied loan id into a positive integer.
///
/// Leading `:` artefacts and surrounding whitespace are stripped first.
pub fn parse_loan_id(raw: &str) -> Result<u64, ValidationError> {
    let cleaned = raw.trim().trim_start_matches(':').trim();
    match cleaned.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::invalid_loan_id(raw)),
    }
}
