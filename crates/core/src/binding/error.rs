//! Binding error types.

use nivaran_shared::types::{BindingId, GrievanceId, MoneyError};
use thiserror::Error;

/// Errors raised by grievance budget bindings and their store.
#[derive(Debug, Error)]
pub enum BindingError {
    /// Binding not found.
    #[error("Binding not found: {0}")]
    NotFound(BindingId),

    /// The grievance already has a binding.
    #[error("Grievance {0} already has a budget binding")]
    DuplicateGrievance(GrievanceId),

    /// Binding has already been settled and is immutable.
    #[error("Binding {0} has already been settled")]
    AlreadySettled(BindingId),

    /// Expense description is blank.
    #[error("Expense description cannot be empty")]
    EmptyDescription,

    /// Malformed monetary amount.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl BindingError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::DuplicateGrievance(_) => 409,
            Self::AlreadySettled(_) => 422,
            Self::EmptyDescription | Self::Money(_) => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BINDING_NOT_FOUND",
            Self::DuplicateGrievance(_) => "DUPLICATE_GRIEVANCE_BINDING",
            Self::AlreadySettled(_) => "BINDING_ALREADY_SETTLED",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::Money(_) => "INVALID_AMOUNT",
        }
    }
}
