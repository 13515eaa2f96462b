//! Review decision validation.
//!
//! This is the pure state-machine half of reconciliation: it validates a
//! decision against the binding's state and produces a [`ReviewAction`]
//! carrying the audit trail. The engine crate applies the monetary side
//! under the budget record's lock.

use chrono::Utc;
use nivaran_shared::types::{AdminId, BindingId};

use crate::binding::{BindingError, BindingState};

use super::error::ReconcileError;
use super::types::{ReviewAction, ReviewDecision};

/// Stateless service validating review decisions.
pub struct ReviewService;

impl ReviewService {
    /// Validates a review decision against the binding state.
    ///
    /// Rework and reject decisions require non-empty notes: the engineer
    /// needs instructions, and a released reservation needs a recorded
    /// reason.
    ///
    /// # Errors
    ///
    /// `Binding(AlreadySettled)` if the binding is settled,
    /// `NotesRequired` for a rework/reject without notes.
    pub fn review(
        binding_id: BindingId,
        state: BindingState,
        decision: ReviewDecision,
        reviewed_by: AdminId,
        notes: Option<String>,
    ) -> Result<ReviewAction, ReconcileError> {
        if state.is_terminal() {
            return Err(BindingError::AlreadySettled(binding_id).into());
        }

        let reviewed_at = Utc::now();
        match decision {
            ReviewDecision::Approve => Ok(ReviewAction::Approve {
                reviewed_by,
                reviewed_at,
                notes,
            }),
            ReviewDecision::Rework => {
                let notes = Self::required_notes(decision, notes)?;
                Ok(ReviewAction::Rework {
                    reviewed_by,
                    reviewed_at,
                    notes,
                })
            }
            ReviewDecision::Reject => {
                let notes = Self::required_notes(decision, notes)?;
                Ok(ReviewAction::Reject {
                    reviewed_by,
                    reviewed_at,
                    notes,
                })
            }
        }
    }

    fn required_notes(
        decision: ReviewDecision,
        notes: Option<String>,
    ) -> Result<String, ReconcileError> {
        match notes {
            Some(n) if !n.trim().is_empty() => Ok(n),
            _ => Err(ReconcileError::NotesRequired(decision)),
        }
    }
}
