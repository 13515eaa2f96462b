//! Idempotent monthly payroll runs against the active budget.

use std::sync::Arc;

use chrono::NaiveDate;
use nivaran_core::events::EngineEvent;
use nivaran_core::payroll::{PayrollError, PayrollPeriod, PayrollRun, PayrollService, PendingPayroll};
use nivaran_shared::types::EngineerId;
use rust_decimal::Decimal;

use crate::events::EventSink;
use crate::store::BudgetStore;

/// Runs payroll and manages the active budget's engineer roster.
pub struct PayrollProcessor {
    budgets: Arc<BudgetStore>,
    events: Arc<dyn EventSink>,
}

impl PayrollProcessor {
    /// Creates a processor over the shared budget store.
    #[must_use]
    pub fn new(budgets: Arc<BudgetStore>, events: Arc<dyn EventSink>) -> Self {
        Self { budgets, events }
    }

    /// Previews the payroll for a period without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveBudget` if no budget is active.
    pub async fn compute_pending(
        &self,
        period: PayrollPeriod,
    ) -> Result<PendingPayroll, PayrollError> {
        let handle = self.budgets.active().await?;
        let record = handle.lock().await;
        Ok(PayrollService::compute_pending(&record, period))
    }

    /// Runs payroll for a period.
    ///
    /// Idempotent: retrying after a timeout either fails with
    /// `AlreadyProcessed` or runs for the first time; the salary pool is
    /// debited exactly once per `(month, year)`. Obligations exceeding
    /// the remaining salary budget emit a `BudgetOverrun` warning but do
    /// not fail the run.
    ///
    /// # Errors
    ///
    /// `NoActiveBudget` or `AlreadyProcessed`.
    pub async fn process(&self, period: PayrollPeriod) -> Result<PayrollRun, PayrollError> {
        let handle = self.budgets.active().await?;
        let mut record = handle.lock().await;
        let run = PayrollService::apply(&mut record, period)?;
        let fiscal_year = record.fiscal_year.clone();
        drop(record);

        self.events.emit(&EngineEvent::PayrollProcessed {
            fiscal_year: fiscal_year.clone(),
            month: period.month(),
            year: period.year(),
            total_amount: run.receipt.total_amount,
            engineer_count: run.receipt.engineer_count,
        });
        if let Some(shortfall) = run.shortfall {
            self.events.emit(&EngineEvent::BudgetOverrun {
                fiscal_year,
                category: None,
                overage: shortfall,
            });
        }

        Ok(run)
    }

    /// Adds an engineer to the active budget's payroll.
    ///
    /// # Errors
    ///
    /// `NoActiveBudget`, `DuplicateEngineer`, or a `Money` validation
    /// error for a non-positive salary.
    pub async fn add_engineer(
        &self,
        engineer_id: EngineerId,
        monthly_salary: Decimal,
        joined_date: NaiveDate,
    ) -> Result<(), PayrollError> {
        let handle = self.budgets.active().await?;
        let mut record = handle.lock().await;
        PayrollService::add_engineer(&mut record, engineer_id, monthly_salary, joined_date)?;
        tracing::info!(%engineer_id, %monthly_salary, "engineer added to payroll");
        Ok(())
    }

    /// Excludes an engineer from future payroll runs.
    ///
    /// # Errors
    ///
    /// `NoActiveBudget` or `EngineerNotFound`.
    pub async fn deactivate_engineer(&self, engineer_id: EngineerId) -> Result<(), PayrollError> {
        let handle = self.budgets.active().await?;
        let mut record = handle.lock().await;
        PayrollService::deactivate_engineer(&mut record, engineer_id)?;
        tracing::info!(%engineer_id, "engineer deactivated");
        Ok(())
    }
}
