//! Payroll computation against the salary pool.

use chrono::{NaiveDate, Utc};
use nivaran_shared::types::money::validate_positive_amount;
use nivaran_shared::types::EngineerId;
use rust_decimal::Decimal;

use crate::budget::types::{BudgetRecord, EngineerRecord};

use super::error::PayrollError;
use super::types::{PayrollPeriod, PayrollReceipt, PayrollRun, PendingPayroll};

/// Payroll service for business logic.
pub struct PayrollService;

impl PayrollService {
    /// Computes the pending payroll for a period without mutating
    /// anything.
    #[must_use]
    pub fn compute_pending(record: &BudgetRecord, period: PayrollPeriod) -> PendingPayroll {
        let (total, count) = Self::active_salaries(record);
        PendingPayroll {
            total_pending_salary: total,
            active_engineer_count: count,
            already_processed: record.has_receipt(period.month(), period.year()),
            salary_budget_remaining: record.salary_pool.remaining(),
        }
    }

    /// Runs payroll for a period, debiting the salary pool and appending
    /// a receipt.
    ///
    /// Idempotent per `(month, year)`: the second run fails with
    /// `AlreadyProcessed` and changes nothing. Obligations exceeding the
    /// remaining salary budget do NOT fail the run; the shortfall is
    /// reported on the result instead, since salaries are not optional.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyProcessed` if a receipt exists for the period.
    pub fn apply(
        record: &mut BudgetRecord,
        period: PayrollPeriod,
    ) -> Result<PayrollRun, PayrollError> {
        if record.has_receipt(period.month(), period.year()) {
            return Err(PayrollError::AlreadyProcessed {
                month: period.month(),
                year: period.year(),
            });
        }

        let (total, count) = Self::active_salaries(record);
        let remaining_before = record.salary_pool.remaining();

        record.salary_pool.spent += total;
        let receipt = PayrollReceipt {
            month: period.month(),
            year: period.year(),
            total_amount: total,
            engineer_count: count,
            processed_at: Utc::now(),
        };
        record.payroll_history.push(receipt.clone());
        record.touch();

        let shortfall = if total > remaining_before {
            Some(total - remaining_before)
        } else {
            None
        };

        Ok(PayrollRun { receipt, shortfall })
    }

    /// Adds an engineer to the budget's payroll.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEngineer` if the engineer is already present, or
    /// a `Money` validation error for a non-positive salary.
    pub fn add_engineer(
        record: &mut BudgetRecord,
        engineer_id: EngineerId,
        monthly_salary: Decimal,
        joined_date: NaiveDate,
    ) -> Result<(), PayrollError> {
        validate_positive_amount(monthly_salary)?;
        if record.engineer(engineer_id).is_some() {
            return Err(PayrollError::DuplicateEngineer(engineer_id));
        }

        record.engineers.push(EngineerRecord {
            engineer_id,
            monthly_salary,
            joined_date,
            active: true,
        });
        record.touch();
        Ok(())
    }

    /// Excludes an engineer from future payroll runs. Past receipts are
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `EngineerNotFound` if the engineer is not on the payroll.
    pub fn deactivate_engineer(
        record: &mut BudgetRecord,
        engineer_id: EngineerId,
    ) -> Result<(), PayrollError> {
        let engineer = record
            .engineer_mut(engineer_id)
            .ok_or(PayrollError::EngineerNotFound(engineer_id))?;
        engineer.active = false;
        record.touch();
        Ok(())
    }

    fn active_salaries(record: &BudgetRecord) -> (Decimal, u32) {
        let total = record
            .engineers
            .iter()
            .filter(|e| e.active)
            .map(|e| e.monthly_salary)
            .sum();
        let count = u32::try_from(record.engineers.iter().filter(|e| e.active).count())
            .unwrap_or(u32::MAX);
        (total, count)
    }
}
