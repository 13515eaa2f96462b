//! Budget error types.

use nivaran_shared::error::AppError;
use nivaran_shared::types::{GrievanceId, MoneyError};
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{BudgetStatus, Category};

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// No budget exists for the fiscal year.
    #[error("Budget not found for fiscal year {0}")]
    NotFound(String),

    /// A budget already exists for the fiscal year.
    #[error("Budget already exists for fiscal year {0}")]
    DuplicateFiscalYear(String),

    /// No budget is currently active.
    #[error("No active budget")]
    NoActiveBudget,

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: BudgetStatus,
        /// The attempted target status.
        to: BudgetStatus,
    },

    /// Activation would supersede a budget for a later fiscal year.
    #[error("Cannot supersede active budget {active} with earlier fiscal year {attempted}")]
    NotLaterFiscalYear {
        /// The currently active fiscal year.
        active: String,
        /// The fiscal year that attempted activation.
        attempted: String,
    },

    /// Operation requires an active budget.
    #[error("Budget is not active (status: {0})")]
    NotActive(BudgetStatus),

    /// Start date is not before end date.
    #[error("Budget start date must be before end date")]
    InvalidDateRange,

    /// Salary and operational allocations exceed the total envelope.
    #[error("Pool allocations {salary} + {operational} exceed total {total}")]
    PoolsExceedTotal {
        /// Salary pool allocation.
        salary: Decimal,
        /// Operational pool allocation.
        operational: Decimal,
        /// Total envelope.
        total: Decimal,
    },

    /// Category allocations exceed the operational pool.
    #[error("Category allocations sum to {allocated_sum}, exceeding operational pool {pool}")]
    CategoryAllocationsExceedPool {
        /// Sum of per-category allocations.
        allocated_sum: Decimal,
        /// Operational pool allocation.
        pool: Decimal,
    },

    /// The same category was allocated twice in one input.
    #[error("Duplicate allocation for category {0}")]
    DuplicateCategoryAllocation(Category),

    /// Category has no allocation and cannot accept reservations.
    #[error("Category {0} is not configured in this budget")]
    CategoryNotConfigured(Category),

    /// Category pool cannot cover the requested reservation.
    #[error("Insufficient funds in {category}: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The category the reservation targeted.
        category: Category,
        /// Requested reservation amount.
        requested: Decimal,
        /// Funds available at the time of the check.
        available: Decimal,
    },

    /// Cannot shrink an allocation below already-committed funds.
    #[error("New allocation {requested} for {category} is below committed {committed}")]
    BelowCommitted {
        /// The category being re-allocated.
        category: Category,
        /// Spent plus pending funds.
        committed: Decimal,
        /// The rejected new allocation.
        requested: Decimal,
    },

    /// The grievance already has a budget binding.
    #[error("Grievance {0} already has an assigned budget")]
    GrievanceAlreadyAssigned(GrievanceId),

    /// Malformed monetary amount.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl BudgetError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::NoActiveBudget => 404,
            Self::InvalidDateRange | Self::Money(_) => 400,
            Self::DuplicateFiscalYear(_)
            | Self::DuplicateCategoryAllocation(_)
            | Self::GrievanceAlreadyAssigned(_) => 409,
            Self::InvalidTransition { .. }
            | Self::NotLaterFiscalYear { .. }
            | Self::NotActive(_)
            | Self::PoolsExceedTotal { .. }
            | Self::CategoryAllocationsExceedPool { .. }
            | Self::CategoryNotConfigured(_)
            | Self::InsufficientFunds { .. }
            | Self::BelowCommitted { .. } => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BUDGET_NOT_FOUND",
            Self::DuplicateFiscalYear(_) => "DUPLICATE_FISCAL_YEAR",
            Self::NoActiveBudget => "NO_ACTIVE_BUDGET",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotLaterFiscalYear { .. } => "NOT_LATER_FISCAL_YEAR",
            Self::NotActive(_) => "BUDGET_NOT_ACTIVE",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::PoolsExceedTotal { .. } => "POOLS_EXCEED_TOTAL",
            Self::CategoryAllocationsExceedPool { .. } => "CATEGORY_ALLOCATIONS_EXCEED_POOL",
            Self::DuplicateCategoryAllocation(_) => "DUPLICATE_CATEGORY_ALLOCATION",
            Self::CategoryNotConfigured(_) => "CATEGORY_NOT_CONFIGURED",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::BelowCommitted { .. } => "BELOW_COMMITTED",
            Self::GrievanceAlreadyAssigned(_) => "GRIEVANCE_ALREADY_ASSIGNED",
            Self::Money(_) => "INVALID_AMOUNT",
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(error: BudgetError) -> Self {
        match error.status_code() {
            404 => Self::NotFound(error.to_string()),
            409 => Self::Conflict(error.to_string()),
            400 => Self::Validation(error.to_string()),
            _ => Self::BusinessRule(error.to_string()),
        }
    }
}
