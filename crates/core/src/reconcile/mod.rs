//! Completed-task review and settlement types.
//!
//! # Modules
//!
//! - `types` - Decisions, actions, and confirmation outcomes
//! - `error` - Reconciliation-specific error types
//! - `service` - Pure review-decision validation

pub mod error;
pub mod service;
pub mod types;

pub use error::ReconcileError;
pub use service::ReviewService;
pub use types::{
    AdjustmentEntry, BindingFailure, BulkConfirmOutcome, ConfirmOutcome, ReviewAction,
    ReviewDecision,
};
