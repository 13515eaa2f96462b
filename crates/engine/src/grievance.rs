//! Read-only seam to the grievance workflow.
//!
//! The engine never mutates grievance status. It asks this collaborator
//! whether a grievance is reviewable and reports confirmation outcomes;
//! the grievance workflow applies the corresponding status transition.

use nivaran_shared::types::GrievanceId;

/// Collaborator view of the grievance workflow.
pub trait GrievanceDirectory: Send + Sync {
    /// True when the grievance is completed and awaiting admin review.
    fn is_awaiting_review(&self, grievance_id: GrievanceId) -> bool;
}

/// Directory that treats every grievance as awaiting review.
///
/// Useful for single-tenant deployments where the review gate lives
/// entirely in the admin UI, and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysReviewable;

impl GrievanceDirectory for AlwaysReviewable {
    fn is_awaiting_review(&self, _grievance_id: GrievanceId) -> bool {
        true
    }
}
