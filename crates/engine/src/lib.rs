//! Concurrent stores and orchestration services for Nivaran's budget
//! engine.
//!
//! This crate wires the pure logic from `nivaran-core` to in-memory
//! stores keyed by natural keys (fiscal year, binding id, grievance id)
//! and serializes mutations per budget record. It is what the admin
//! HTTP layer calls; it performs no user I/O itself.
//!
//! # Modules
//!
//! - `store` - Keyed stores with per-record mutation locks
//! - `events` - Event sink seam for the notification collaborator
//! - `grievance` - Read-only seam to the grievance workflow
//! - `manager` - Budget creation, activation, allocation, assignment
//! - `reconcile` - Single and bulk completed-task confirmation
//! - `payroll` - Idempotent monthly payroll runs

pub mod events;
pub mod grievance;
pub mod manager;
pub mod payroll;
pub mod reconcile;
pub mod store;

pub use events::{EventSink, TracingSink};
pub use grievance::{AlwaysReviewable, GrievanceDirectory};
pub use manager::BudgetManager;
pub use payroll::PayrollProcessor;
pub use reconcile::ReconciliationEngine;
pub use store::{BindingStore, BudgetStore};
