//! Per-grievance budget bindings.
//!
//! A binding is created when an admin assigns an engineer with a
//! nonzero budget, accrues expenses while the work is in flight, and is
//! settled exactly once by the reconciliation engine.

pub mod error;
pub mod types;

pub use error::BindingError;
pub use types::{BindingState, ExpenseEntry, GrievanceBudgetBinding};
