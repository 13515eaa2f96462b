//! Reconciliation error types.

use nivaran_shared::error::AppError;
use nivaran_shared::types::{BindingId, GrievanceId, MoneyError};
use thiserror::Error;

use crate::binding::BindingError;
use crate::budget::BudgetError;

use super::types::ReviewDecision;

/// Errors raised by the reconciliation workflow.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The grievance is not in a reviewable status.
    #[error("Grievance {0} is not awaiting review")]
    NotAwaitingReview(GrievanceId),

    /// The decision requires notes for the engineer or the audit trail.
    #[error("Notes are required for a {0} decision")]
    NotesRequired(ReviewDecision),

    /// Policy requires bill evidence before approval.
    #[error("Binding {0} has no bill evidence attached")]
    EvidenceRequired(BindingId),

    /// Adjustments only apply to settled bindings.
    #[error("Binding {0} is not settled; use the review workflow instead")]
    NotSettled(BindingId),

    /// Adjustment reason is blank.
    #[error("Adjustment reason cannot be empty")]
    ReasonRequired,

    /// Adjustment would drive a spent total negative.
    #[error("Adjustment of {delta} would make category spend negative")]
    AdjustmentOutOfRange {
        /// The rejected delta.
        delta: rust_decimal::Decimal,
    },

    /// Malformed monetary amount.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Underlying budget failure.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Underlying binding failure.
    #[error(transparent)]
    Binding(#[from] BindingError),
}

impl ReconcileError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotAwaitingReview(_)
            | Self::EvidenceRequired(_)
            | Self::NotSettled(_)
            | Self::AdjustmentOutOfRange { .. } => 422,
            Self::NotesRequired(_) | Self::ReasonRequired | Self::Money(_) => 400,
            Self::Budget(e) => e.status_code(),
            Self::Binding(e) => e.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotAwaitingReview(_) => "NOT_AWAITING_REVIEW",
            Self::NotesRequired(_) => "NOTES_REQUIRED",
            Self::EvidenceRequired(_) => "EVIDENCE_REQUIRED",
            Self::NotSettled(_) => "BINDING_NOT_SETTLED",
            Self::ReasonRequired => "ADJUSTMENT_REASON_REQUIRED",
            Self::AdjustmentOutOfRange { .. } => "ADJUSTMENT_OUT_OF_RANGE",
            Self::Money(_) => "INVALID_AMOUNT",
            Self::Budget(e) => e.error_code(),
            Self::Binding(e) => e.error_code(),
        }
    }
}

impl From<ReconcileError> for AppError {
    fn from(error: ReconcileError) -> Self {
        match error.status_code() {
            404 => Self::NotFound(error.to_string()),
            409 => Self::Conflict(error.to_string()),
            400 => Self::Validation(error.to_string()),
            _ => Self::BusinessRule(error.to_string()),
        }
    }
}
