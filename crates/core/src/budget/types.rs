//! Budget record and pool types.

use chrono::{DateTime, NaiveDate, Utc};
use nivaran_shared::types::{AdminId, BudgetId, EngineerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payroll::PayrollReceipt;

/// Grievance categories funded by the operational pool.
///
/// This is a closed enumeration: every budget carries one pool per
/// category, and a category the admin never funded simply stays at
/// zero allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Water supply and pipelines.
    Water,
    /// Electrical faults and power infrastructure.
    Electricity,
    /// Road surfaces, potholes, footpaths.
    Roads,
    /// Garbage collection and public sanitation.
    Sanitation,
    /// Storm drains and sewerage.
    Drainage,
    /// Street lighting.
    Streetlight,
    /// Parks and public green spaces.
    Parks,
    /// Anything that does not fit the named categories.
    Other,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 8] = [
        Self::Water,
        Self::Electricity,
        Self::Roads,
        Self::Sanitation,
        Self::Drainage,
        Self::Streetlight,
        Self::Parks,
        Self::Other,
    ];

    /// Returns the string representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Electricity => "electricity",
            Self::Roads => "roads",
            Self::Sanitation => "sanitation",
            Self::Drainage => "drainage",
            Self::Streetlight => "streetlight",
            Self::Parks => "parks",
            Self::Other => "other",
        }
    }

    /// Parses a category from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "water" => Some(Self::Water),
            "electricity" => Some(Self::Electricity),
            "roads" => Some(Self::Roads),
            "sanitation" => Some(Self::Sanitation),
            "drainage" => Some(Self::Drainage),
            "streetlight" => Some(Self::Streetlight),
            "parks" => Some(Self::Parks),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a fiscal-year budget.
///
/// The valid transitions are:
/// - Draft → Active (activation, exactly once)
/// - Active → Closed (superseded by a newer active budget)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Budget is being prepared and holds no live reservations.
    Draft,
    /// Budget is the single live budget accepting reservations.
    Active,
    /// Budget has been superseded (immutable).
    Closed,
}

impl BudgetStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Returns true if the budget accepts reservations and spending.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Salary pool: the envelope payroll is debited from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryPool {
    /// Amount allocated for the fiscal year.
    pub allocated: Decimal,
    /// Amount debited by payroll runs so far.
    pub spent: Decimal,
}

impl SalaryPool {
    /// Remaining salary budget. Negative after an absorbed shortfall.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.allocated - self.spent
    }
}

/// Operational pool: the envelope category pools draw from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalPool {
    /// Amount allocated for the fiscal year.
    pub allocated: Decimal,
    /// Actual spend settled across all categories.
    pub spent: Decimal,
    /// Funds held by in-flight reservations across all categories.
    pub pending: Decimal,
    /// Contingency earmark set by the admin, untouchable by reservations.
    pub reserved: Decimal,
}

impl OperationalPool {
    /// Funds still available for new category allocations or reservations.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.allocated - self.spent - self.pending - self.reserved
    }
}

/// Per-category sub-pool of the operational budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPool {
    /// The category this pool funds.
    pub category: Category,
    /// Amount allocated to this category. Zero means unconfigured.
    pub allocated: Decimal,
    /// Actual settled spend.
    pub spent: Decimal,
    /// Funds held by in-flight reservations.
    pub pending: Decimal,
    /// Number of grievances ever assigned a budget from this pool.
    pub grievance_count: u32,
}

impl CategoryPool {
    /// Creates an empty pool for a category.
    #[must_use]
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            allocated: Decimal::ZERO,
            spent: Decimal::ZERO,
            pending: Decimal::ZERO,
            grievance_count: 0,
        }
    }

    /// Returns true if the admin has allocated funds to this category.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.allocated > Decimal::ZERO
    }

    /// Funds available for new reservations.
    /// Negative once an overrun has been absorbed.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.allocated - self.spent - self.pending
    }
}

/// An engineer drawing a monthly salary from the budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineerRecord {
    /// The engineer's identity (supplied by the identity collaborator).
    pub engineer_id: EngineerId,
    /// Monthly salary in the budget's currency unit.
    pub monthly_salary: Decimal,
    /// Date the engineer joined.
    pub joined_date: NaiveDate,
    /// Inactive engineers are excluded from payroll runs.
    pub active: bool,
}

/// One fiscal year's budget: salary pool, operational pool, and
/// per-category sub-pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRecord {
    /// Budget ID.
    pub id: BudgetId,
    /// Fiscal year label, unique across budgets (e.g. "2026-2027").
    pub fiscal_year: String,
    /// First day of the fiscal year.
    pub start_date: NaiveDate,
    /// Last day of the fiscal year.
    pub end_date: NaiveDate,
    /// Total envelope; salary + operational allocations must fit inside.
    pub total_allocated: Decimal,
    /// Salary pool.
    pub salary_pool: SalaryPool,
    /// Operational pool.
    pub operational_pool: OperationalPool,
    /// One pool per category, in `Category::ALL` order.
    pub category_pools: Vec<CategoryPool>,
    /// Engineers on this budget's payroll, unique per engineer.
    pub engineers: Vec<EngineerRecord>,
    /// Receipts of processed payroll runs, append-only.
    pub payroll_history: Vec<PayrollReceipt>,
    /// Lifecycle status.
    pub status: BudgetStatus,
    /// Admin who created the budget.
    pub created_by: AdminId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BudgetRecord {
    /// Returns the pool for a category.
    ///
    /// Every category always has a pool; the mapping is total.
    #[must_use]
    pub fn category(&self, category: Category) -> &CategoryPool {
        self.category_pools
            .iter()
            .find(|p| p.category == category)
            .unwrap_or_else(|| unreachable!("category pools form a total mapping"))
    }

    /// Mutable access to the pool for a category.
    #[must_use]
    pub fn category_mut(&mut self, category: Category) -> &mut CategoryPool {
        self.category_pools
            .iter_mut()
            .find(|p| p.category == category)
            .unwrap_or_else(|| unreachable!("category pools form a total mapping"))
    }

    /// Looks up an engineer's payroll record.
    #[must_use]
    pub fn engineer(&self, engineer_id: EngineerId) -> Option<&EngineerRecord> {
        self.engineers
            .iter()
            .find(|e| e.engineer_id == engineer_id)
    }

    /// Mutable lookup of an engineer's payroll record.
    pub fn engineer_mut(&mut self, engineer_id: EngineerId) -> Option<&mut EngineerRecord> {
        self.engineers
            .iter_mut()
            .find(|e| e.engineer_id == engineer_id)
    }

    /// Returns true if payroll for the given month/year was already run.
    #[must_use]
    pub fn has_receipt(&self, month: u32, year: i32) -> bool {
        self.payroll_history
            .iter()
            .any(|r| r.month == month && r.year == year)
    }

    /// Bumps the update timestamp after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating a new fiscal-year budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Fiscal year label, unique key (e.g. "2026-2027").
    pub fiscal_year: String,
    /// First day of the fiscal year.
    pub start_date: NaiveDate,
    /// Last day of the fiscal year.
    pub end_date: NaiveDate,
    /// Total envelope.
    pub total_allocated: Decimal,
    /// Salary pool allocation.
    pub salary_allocated: Decimal,
    /// Operational pool allocation.
    pub operational_allocated: Decimal,
    /// Contingency earmark inside the operational pool.
    pub operational_reserve: Decimal,
    /// Initial per-category allocations; omitted categories stay at zero.
    pub category_allocations: Vec<(Category, Decimal)>,
    /// Admin creating the budget.
    pub created_by: AdminId,
}

/// Per-category usage line for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUsage {
    /// The category.
    pub category: Category,
    /// Allocated amount.
    pub allocated: Decimal,
    /// Settled spend.
    pub spent: Decimal,
    /// Funds held by reservations.
    pub pending: Decimal,
    /// Funds available for new reservations.
    pub available: Decimal,
    /// Utilization percentage (spent / allocated * 100).
    pub utilization_percent: Decimal,
    /// Grievances assigned against this category.
    pub grievance_count: u32,
}

/// Budget summary for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Fiscal year label.
    pub fiscal_year: String,
    /// Lifecycle status.
    pub status: BudgetStatus,
    /// Total envelope.
    pub total_allocated: Decimal,
    /// Salary pool allocation.
    pub salary_allocated: Decimal,
    /// Salary debited so far.
    pub salary_spent: Decimal,
    /// Operational pool allocation.
    pub operational_allocated: Decimal,
    /// Operational funds still uncommitted.
    pub operational_available: Decimal,
    /// Per-category usage lines.
    pub categories: Vec<CategoryUsage>,
}
