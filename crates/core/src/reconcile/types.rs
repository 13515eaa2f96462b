//! Completed-task review types.

use chrono::{DateTime, Utc};
use nivaran_shared::types::{AdminId, BindingId, GrievanceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::Category;

/// Admin decision over a completed task awaiting review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    /// Accept the work; settle against actual expenses.
    Approve,
    /// Send the task back to the engineer; no monetary change.
    Rework,
    /// Refuse the work; release the full reservation.
    Reject,
}

impl ReviewDecision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Rework => "rework",
            Self::Reject => "reject",
        }
    }

    /// Parses a decision from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "rework" => Some(Self::Rework),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated review with its audit trail.
#[derive(Debug, Clone)]
pub enum ReviewAction {
    /// Approve the work.
    Approve {
        /// The admin who reviewed.
        reviewed_by: AdminId,
        /// When the review happened.
        reviewed_at: DateTime<Utc>,
        /// Optional notes from the reviewer.
        notes: Option<String>,
    },
    /// Send the task back for rework.
    Rework {
        /// The admin who reviewed.
        reviewed_by: AdminId,
        /// When the review happened.
        reviewed_at: DateTime<Utc>,
        /// Instructions for the engineer (required).
        notes: String,
    },
    /// Reject the work outright.
    Reject {
        /// The admin who reviewed.
        reviewed_by: AdminId,
        /// When the review happened.
        reviewed_at: DateTime<Utc>,
        /// The reason for rejection (required).
        notes: String,
    },
}

/// Result of confirming a single binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmOutcome {
    /// The binding that was reviewed.
    pub binding_id: BindingId,
    /// The grievance it belongs to.
    pub grievance_id: GrievanceId,
    /// The decision that was applied.
    pub decision: ReviewDecision,
    /// Actual spend settled against the category (zero for rework/reject).
    pub actual_spent: Decimal,
    /// Delta credited back to the operational pool. Negative on overrun,
    /// zero for rework.
    pub returned: Decimal,
    /// Overage when the engineer overspent the reservation.
    pub overrun: Option<Decimal>,
}

/// One binding's failure inside a bulk confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingFailure {
    /// The binding that failed.
    pub binding_id: BindingId,
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Aggregated result of a bulk confirmation.
///
/// Bindings succeed or fail independently; one failure never aborts the
/// batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkConfirmOutcome {
    /// Bindings settled by this batch.
    pub confirmed_count: usize,
    /// Bindings the batch attempted.
    pub total_count: usize,
    /// Sum of deltas credited back (overruns subtract).
    pub total_returned: Decimal,
    /// Sum of actual spend settled.
    pub total_spent: Decimal,
    /// Failures, one entry per skipped binding.
    pub per_binding_errors: Vec<BindingFailure>,
}

/// Audit entry correcting a settled binding.
///
/// Settlement is terminal; corrections are compensating entries, never
/// reopened state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentEntry {
    /// The settled binding being corrected.
    pub binding_id: BindingId,
    /// Signed correction applied to the category's spent total.
    pub delta: Decimal,
    /// Why the correction was made.
    pub reason: String,
    /// The admin who recorded it.
    pub recorded_by: AdminId,
    /// When it was recorded.
    pub recorded_at: DateTime<Utc>,
}
