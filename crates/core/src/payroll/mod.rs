//! Monthly payroll against the salary pool.
//!
//! Payroll runs are idempotent per calendar month: the receipt keyed by
//! `(month, year)` is both the audit record and the idempotency guard.

pub mod error;
pub mod service;
pub mod types;

pub use error::PayrollError;
pub use service::PayrollService;
pub use types::{PayrollPeriod, PayrollReceipt, PayrollRun, PendingPayroll};
