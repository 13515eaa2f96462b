//! Budget store: fiscal-year keyed records with per-record mutation
//! locks and the single-active-budget index.

use std::sync::Arc;

use dashmap::DashMap;
use nivaran_core::budget::{BudgetError, BudgetRecord, BudgetService, BudgetStatus};
use tokio::sync::{Mutex, RwLock};

/// Store of budget records, one per fiscal year.
///
/// Each record sits behind its own `Mutex`: `reserve`, `settle`,
/// `update_allocation`, and `process` all read aggregate totals and
/// write them back, so mutations must serialize per record. Reservations
/// against different budgets never contend.
///
/// The active budget is tracked in an explicit index, queried on every
/// call rather than cached by callers, so concurrent admin sessions
/// never act on a stale notion of "the" budget.
pub struct BudgetStore {
    records: DashMap<String, Arc<Mutex<BudgetRecord>>>,
    active: RwLock<Option<String>>,
}

impl Default for BudgetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            active: RwLock::new(None),
        }
    }

    /// Inserts a new budget record.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateFiscalYear` if a record for the fiscal year
    /// already exists.
    pub fn insert(&self, record: BudgetRecord) -> Result<(), BudgetError> {
        match self.records.entry(record.fiscal_year.clone()) {
            dashmap::Entry::Occupied(_) => {
                Err(BudgetError::DuplicateFiscalYear(record.fiscal_year))
            }
            dashmap::Entry::Vacant(entry) => {
                entry.insert(Arc::new(Mutex::new(record)));
                Ok(())
            }
        }
    }

    /// Returns the handle for a fiscal year's record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record exists for the fiscal year.
    pub fn get(&self, fiscal_year: &str) -> Result<Arc<Mutex<BudgetRecord>>, BudgetError> {
        self.records
            .get(fiscal_year)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| BudgetError::NotFound(fiscal_year.to_string()))
    }

    /// Returns the handle for the active budget.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveBudget` if no budget is active.
    pub async fn active(&self) -> Result<Arc<Mutex<BudgetRecord>>, BudgetError> {
        let active = self.active.read().await;
        match active.as_deref() {
            Some(fiscal_year) => self.get(fiscal_year),
            None => Err(BudgetError::NoActiveBudget),
        }
    }

    /// The fiscal year of the active budget, if any.
    pub async fn active_fiscal_year(&self) -> Option<String> {
        self.active.read().await.clone()
    }

    /// Activates a draft budget, closing the previously active one in
    /// the same critical section so that at no point two budgets are
    /// active, and at no point none is (once one has been).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown fiscal year, `InvalidTransition`
    /// unless the budget is a draft, and `NotLaterFiscalYear` when the
    /// candidate does not start after the currently active budget.
    pub async fn activate(&self, fiscal_year: &str) -> Result<(), BudgetError> {
        let mut active = self.active.write().await;
        let handle = self.get(fiscal_year)?;

        if let Some(active_fy) = active.clone() {
            if active_fy == fiscal_year {
                let record = handle.lock().await;
                return Err(BudgetError::InvalidTransition {
                    from: record.status,
                    to: BudgetStatus::Active,
                });
            }

            let active_handle = self.get(&active_fy)?;
            let mut next = handle.lock().await;
            let mut current = active_handle.lock().await;

            if next.start_date <= current.start_date {
                return Err(BudgetError::NotLaterFiscalYear {
                    active: active_fy,
                    attempted: fiscal_year.to_string(),
                });
            }

            BudgetService::activate(&mut next)?;
            BudgetService::close(&mut current)?;
        } else {
            let mut next = handle.lock().await;
            BudgetService::activate(&mut next)?;
        }

        *active = Some(fiscal_year.to_string());
        Ok(())
    }

    /// Number of budgets in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no budgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
