//! Budget service for record creation, lifecycle transitions, and
//! summary reporting.

use chrono::Utc;
use nivaran_shared::types::money::validate_amount;
use nivaran_shared::types::BudgetId;
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{
    BudgetRecord, BudgetStatus, BudgetSummary, Category, CategoryPool, CategoryUsage,
    CreateBudgetInput, OperationalPool, SalaryPool,
};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Validates input and builds a new draft budget record.
    ///
    /// All monetary inputs are validated before any state is built: the
    /// salary and operational pools must fit inside the total envelope,
    /// and the per-category allocations must fit inside the operational
    /// pool. The resulting record carries one pool per category
    /// (unlisted categories at zero allocation) and starts in `Draft`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange`, `PoolsExceedTotal`,
    /// `DuplicateCategoryAllocation`, `CategoryAllocationsExceedPool`, or
    /// a `Money` validation error.
    pub fn create(input: CreateBudgetInput) -> Result<BudgetRecord, BudgetError> {
        if input.start_date >= input.end_date {
            return Err(BudgetError::InvalidDateRange);
        }

        validate_amount(input.total_allocated)?;
        validate_amount(input.salary_allocated)?;
        validate_amount(input.operational_allocated)?;
        validate_amount(input.operational_reserve)?;
        for (_, amount) in &input.category_allocations {
            validate_amount(*amount)?;
        }

        if input.salary_allocated + input.operational_allocated > input.total_allocated {
            return Err(BudgetError::PoolsExceedTotal {
                salary: input.salary_allocated,
                operational: input.operational_allocated,
                total: input.total_allocated,
            });
        }

        let mut category_pools: Vec<CategoryPool> =
            Category::ALL.iter().map(|c| CategoryPool::empty(*c)).collect();
        for (category, amount) in &input.category_allocations {
            let pool = category_pools
                .iter_mut()
                .find(|p| p.category == *category)
                .unwrap_or_else(|| unreachable!("category pools form a total mapping"));
            if pool.allocated > Decimal::ZERO {
                return Err(BudgetError::DuplicateCategoryAllocation(*category));
            }
            pool.allocated = *amount;
        }

        let allocated_sum: Decimal = category_pools.iter().map(|p| p.allocated).sum();
        if allocated_sum > input.operational_allocated {
            return Err(BudgetError::CategoryAllocationsExceedPool {
                allocated_sum,
                pool: input.operational_allocated,
            });
        }

        let now = Utc::now();
        Ok(BudgetRecord {
            id: BudgetId::new(),
            fiscal_year: input.fiscal_year,
            start_date: input.start_date,
            end_date: input.end_date,
            total_allocated: input.total_allocated,
            salary_pool: SalaryPool {
                allocated: input.salary_allocated,
                spent: Decimal::ZERO,
            },
            operational_pool: OperationalPool {
                allocated: input.operational_allocated,
                spent: Decimal::ZERO,
                pending: Decimal::ZERO,
                reserved: input.operational_reserve,
            },
            category_pools,
            engineers: Vec::new(),
            payroll_history: Vec::new(),
            status: BudgetStatus::Draft,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Activates a draft budget. Activation is terminal: there is no way
    /// back to draft.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the budget is in `Draft`.
    pub fn activate(record: &mut BudgetRecord) -> Result<(), BudgetError> {
        match record.status {
            BudgetStatus::Draft => {
                record.status = BudgetStatus::Active;
                record.touch();
                Ok(())
            }
            _ => Err(BudgetError::InvalidTransition {
                from: record.status,
                to: BudgetStatus::Active,
            }),
        }
    }

    /// Closes an active budget when a successor supersedes it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the budget is in `Active`.
    pub fn close(record: &mut BudgetRecord) -> Result<(), BudgetError> {
        match record.status {
            BudgetStatus::Active => {
                record.status = BudgetStatus::Closed;
                record.touch();
                Ok(())
            }
            _ => Err(BudgetError::InvalidTransition {
                from: record.status,
                to: BudgetStatus::Closed,
            }),
        }
    }

    /// Builds a summary of the record for the admin dashboard.
    #[must_use]
    pub fn summary(record: &BudgetRecord) -> BudgetSummary {
        let categories = record
            .category_pools
            .iter()
            .map(|pool| CategoryUsage {
                category: pool.category,
                allocated: pool.allocated,
                spent: pool.spent,
                pending: pool.pending,
                available: pool.available(),
                utilization_percent: Self::utilization(pool.spent, pool.allocated),
                grievance_count: pool.grievance_count,
            })
            .collect();

        BudgetSummary {
            fiscal_year: record.fiscal_year.clone(),
            status: record.status,
            total_allocated: record.total_allocated,
            salary_allocated: record.salary_pool.allocated,
            salary_spent: record.salary_pool.spent,
            operational_allocated: record.operational_pool.allocated,
            operational_available: record.operational_pool.available(),
            categories,
        }
    }

    /// Utilization percentage (spent / allocated * 100), zero when
    /// nothing is allocated.
    #[must_use]
    pub fn utilization(spent: Decimal, allocated: Decimal) -> Decimal {
        if allocated.is_zero() {
            Decimal::ZERO
        } else {
            (spent / allocated * Decimal::ONE_HUNDRED).round_dp(2)
        }
    }
}
