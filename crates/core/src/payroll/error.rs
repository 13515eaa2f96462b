//! Payroll error types.

use nivaran_shared::error::AppError;
use nivaran_shared::types::{EngineerId, MoneyError};
use thiserror::Error;

use crate::budget::BudgetError;

/// Errors raised by payroll operations.
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Payroll was already run for this month.
    #[error("Payroll already processed for {month:02}/{year}")]
    AlreadyProcessed {
        /// The month (1-12).
        month: u32,
        /// The calendar year.
        year: i32,
    },

    /// The engineer is already on this budget's payroll.
    #[error("Engineer {0} is already on the payroll")]
    DuplicateEngineer(EngineerId),

    /// No payroll record exists for the engineer.
    #[error("Engineer {0} is not on the payroll")]
    EngineerNotFound(EngineerId),

    /// Month outside 1-12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Malformed monetary amount.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Underlying budget failure.
    #[error(transparent)]
    Budget(#[from] BudgetError),
}

impl PayrollError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::AlreadyProcessed { .. } | Self::DuplicateEngineer(_) => 409,
            Self::EngineerNotFound(_) => 404,
            Self::InvalidMonth(_) | Self::Money(_) => 400,
            Self::Budget(e) => e.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyProcessed { .. } => "PAYROLL_ALREADY_PROCESSED",
            Self::DuplicateEngineer(_) => "DUPLICATE_ENGINEER",
            Self::EngineerNotFound(_) => "ENGINEER_NOT_FOUND",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::Money(_) => "INVALID_AMOUNT",
            Self::Budget(e) => e.error_code(),
        }
    }
}

impl From<PayrollError> for AppError {
    fn from(error: PayrollError) -> Self {
        match error.status_code() {
            404 => Self::NotFound(error.to_string()),
            409 => Self::Conflict(error.to_string()),
            400 => Self::Validation(error.to_string()),
            _ => Self::BusinessRule(error.to_string()),
        }
    }
}
