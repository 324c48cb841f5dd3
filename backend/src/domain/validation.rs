//! Field validation shared by the entity constructors.
//!
//! Messages are phrased for clients and name the wire field, so adapters can
//! surface them unchanged in the `errors` map of the response envelope.

use thiserror::Error;

/// Longest accepted category or product name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Validation errors raised for required, length-bounded names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameValidationError {
    /// Name is missing or blank.
    #[error("name is required")]
    Missing,
    /// Name exceeds [`MAX_NAME_LENGTH`] characters.
    #[error("name exceeds maximum length of {max}")]
    TooLong {
        /// Configured maximum.
        max: usize,
    },
}

/// Validation errors raised for strictly positive quantities and amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositiveValueError {
    /// Value is missing or zero.
    #[error("{field} is required")]
    Missing {
        /// Wire field name.
        field: &'static str,
    },
    /// Value is negative.
    #[error("{field} must be greater than 0")]
    NotPositive {
        /// Wire field name.
        field: &'static str,
    },
}

/// Trim a candidate name and enforce the required and length rules.
pub(crate) fn normalise_name(raw: &str) -> Result<String, NameValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NameValidationError::Missing);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(NameValidationError::TooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_owned())
}
