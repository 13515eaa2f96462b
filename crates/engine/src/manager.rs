//! Budget management: creation, activation, allocation edits, and
//! reserving funds when an engineer is assigned.

use std::sync::Arc;

use nivaran_core::binding::GrievanceBudgetBinding;
use nivaran_core::budget::{
    BudgetError, BudgetService, BudgetSummary, Category, CategoryAllocator, CreateBudgetInput,
};
use nivaran_shared::types::{BindingId, BudgetId, GrievanceId};
use rust_decimal::Decimal;

use crate::store::{BindingStore, BudgetStore};

/// Admin-facing budget operations.
pub struct BudgetManager {
    budgets: Arc<BudgetStore>,
    bindings: Arc<BindingStore>,
}

impl BudgetManager {
    /// Creates a manager over shared stores.
    #[must_use]
    pub fn new(budgets: Arc<BudgetStore>, bindings: Arc<BindingStore>) -> Self {
        Self { budgets, bindings }
    }

    /// Creates a draft budget for a fiscal year.
    ///
    /// # Errors
    ///
    /// Propagates validation failures from
    /// [`BudgetService::create`] and `DuplicateFiscalYear` from the
    /// store. Nothing is persisted on failure.
    pub fn create_budget(&self, input: CreateBudgetInput) -> Result<BudgetId, BudgetError> {
        let record = BudgetService::create(input)?;
        let budget_id = record.id;
        let fiscal_year = record.fiscal_year.clone();
        self.budgets.insert(record)?;
        tracing::info!(%fiscal_year, %budget_id, "budget created");
        Ok(budget_id)
    }

    /// Activates a draft budget, superseding the currently active one.
    ///
    /// # Errors
    ///
    /// See [`BudgetStore::activate`].
    pub async fn activate_budget(&self, fiscal_year: &str) -> Result<(), BudgetError> {
        self.budgets.activate(fiscal_year).await?;
        tracing::info!(fiscal_year, "budget activated");
        Ok(())
    }

    /// Changes a category's allocation on a budget.
    ///
    /// # Errors
    ///
    /// See [`CategoryAllocator::update_allocation`]; `NotFound` for an
    /// unknown fiscal year.
    pub async fn update_allocation(
        &self,
        fiscal_year: &str,
        category: Category,
        new_allocated: Decimal,
    ) -> Result<(), BudgetError> {
        let handle = self.budgets.get(fiscal_year)?;
        let mut record = handle.lock().await;
        CategoryAllocator::update_allocation(&mut record, category, new_allocated)?;
        tracing::info!(fiscal_year, %category, %new_allocated, "category allocation updated");
        Ok(())
    }

    /// Reserves funds for a grievance and creates its budget binding.
    ///
    /// Called when an admin assigns an engineer with a nonzero budget.
    /// The reservation and the binding are created under the active
    /// budget's lock, so concurrent assignments cannot overcommit a
    /// category or double-bind a grievance.
    ///
    /// # Errors
    ///
    /// `NoActiveBudget`, `GrievanceAlreadyAssigned`, or a reservation
    /// failure from [`CategoryAllocator::reserve`].
    pub async fn assign_budget(
        &self,
        grievance_id: GrievanceId,
        category: Category,
        amount: Decimal,
    ) -> Result<BindingId, BudgetError> {
        let handle = self.budgets.active().await?;
        let mut record = handle.lock().await;

        if self.bindings.binding_for_grievance(grievance_id).is_some() {
            return Err(BudgetError::GrievanceAlreadyAssigned(grievance_id));
        }

        let reservation = CategoryAllocator::reserve(&mut record, category, amount)?;
        let binding = GrievanceBudgetBinding::new(
            grievance_id,
            record.fiscal_year.clone(),
            category,
            reservation.amount(),
        );
        let binding_id = binding.id;

        if self.bindings.insert(binding).is_err() {
            // All assignment paths serialize on the budget lock, so this
            // only fires if a foreign writer touched the binding store.
            CategoryAllocator::release(&mut record, &reservation);
            return Err(BudgetError::GrievanceAlreadyAssigned(grievance_id));
        }

        tracing::debug!(%grievance_id, %binding_id, %category, %amount, "budget reserved");
        Ok(binding_id)
    }

    /// Summary of the active budget.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveBudget` if no budget is active.
    pub async fn summary(&self) -> Result<BudgetSummary, BudgetError> {
        let handle = self.budgets.active().await?;
        let record = handle.lock().await;
        Ok(BudgetService::summary(&record))
    }

    /// Summary of a specific fiscal year's budget.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown fiscal year.
    pub async fn summary_for(&self, fiscal_year: &str) -> Result<BudgetSummary, BudgetError> {
        let handle = self.budgets.get(fiscal_year)?;
        let record = handle.lock().await;
        Ok(BudgetService::summary(&record))
    }
}
