//! Payroll domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PayrollError;

/// A calendar month payroll is run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    month: u32,
    year: i32,
}

impl PayrollPeriod {
    /// Creates a validated payroll period.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonth` unless `month` is 1-12.
    pub fn new(month: u32, year: i32) -> Result<Self, PayrollError> {
        if !(1..=12).contains(&month) {
            return Err(PayrollError::InvalidMonth(month));
        }
        Ok(Self { month, year })
    }

    /// The month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }
}

impl std::fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Immutable proof that salaries were debited for a month.
///
/// At most one receipt exists per `(month, year)`; its presence is what
/// makes payroll idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollReceipt {
    /// The month salaries were paid for (1-12).
    pub month: u32,
    /// The calendar year.
    pub year: i32,
    /// Total debited from the salary pool.
    pub total_amount: Decimal,
    /// Number of active engineers paid.
    pub engineer_count: u32,
    /// When the run was processed.
    pub processed_at: DateTime<Utc>,
}

/// Read-only preview of a payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingPayroll {
    /// Sum of monthly salaries over active engineers.
    pub total_pending_salary: Decimal,
    /// Number of active engineers.
    pub active_engineer_count: u32,
    /// Whether a receipt already exists for the period.
    pub already_processed: bool,
    /// Salary pool allocation minus spend.
    pub salary_budget_remaining: Decimal,
}

/// Outcome of a committed payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRun {
    /// The receipt that was appended.
    pub receipt: PayrollReceipt,
    /// Amount by which salary obligations exceeded the remaining budget.
    /// The run still succeeds; salaries are not optional.
    pub shortfall: Option<Decimal>,
}
