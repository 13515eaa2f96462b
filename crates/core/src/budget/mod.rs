//! Fiscal-year budgets, pools, and the category allocator.
//!
//! # Modules
//!
//! - `types` - Budget record, pools, and category enumeration
//! - `error` - Budget-specific error types
//! - `service` - Record creation, lifecycle transitions, summaries
//! - `allocator` - Reserve / settle / release within category pools

pub mod allocator;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod allocator_props;

pub use allocator::{CategoryAllocator, Reservation, Settlement};
pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    BudgetRecord, BudgetStatus, BudgetSummary, Category, CategoryPool, CategoryUsage,
    CreateBudgetInput, EngineerRecord, OperationalPool, SalaryPool,
};
