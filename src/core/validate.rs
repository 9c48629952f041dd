//! core::validate
//!
//! Structural validation of a populated request.
//!
//! A record is valid when every field tagged `required` holds a non-zero
//! value and the record's own [`Inspect::validate`] hook accepts it.

use thiserror::Error;

use super::inspect::{inspect, InspectError};
use super::record::Inspect;

/// Errors from request validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field(s): {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Inspect(#[from] InspectError),
}

/// Validate a record.
///
/// All missing required fields are reported together, by path.
pub fn validate<R>(record: &mut R) -> Result<(), ValidationError>
where
    R: Inspect + ?Sized,
{
    let missing: Vec<String> = inspect(record)?
        .iter()
        .filter(|field| field.required && field.zero)
        .map(|field| field.path())
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingRequired(missing));
    }

    record.validate().map_err(ValidationError::Rejected)
}
