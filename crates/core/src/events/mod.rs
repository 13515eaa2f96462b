//! Structured events emitted on committed state changes.
//!
//! The engine performs no user I/O; a notification collaborator
//! subscribes to these and decides what becomes an email or a toast.

use nivaran_shared::types::{BindingId, GrievanceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::Category;

/// Events published by the budget engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A monthly payroll run committed.
    PayrollProcessed {
        /// Fiscal year of the budget that was debited.
        fiscal_year: String,
        /// The month paid (1-12).
        month: u32,
        /// The calendar year.
        year: i32,
        /// Total debited from the salary pool.
        total_amount: Decimal,
        /// Number of engineers paid.
        engineer_count: u32,
    },

    /// A grievance budget binding was settled.
    TaskSettled {
        /// Fiscal year of the budget that absorbed the settlement.
        fiscal_year: String,
        /// The settled binding.
        binding_id: BindingId,
        /// The grievance the binding belonged to.
        grievance_id: GrievanceId,
        /// Category the funds came from.
        category: Category,
        /// Amount that was reserved.
        reserved: Decimal,
        /// Actual spend settled.
        actual_spent: Decimal,
        /// Delta credited back (negative on overrun).
        returned: Decimal,
    },

    /// Spending exceeded an allocation. A warning, never a failure: the
    /// money is already spent.
    BudgetOverrun {
        /// Fiscal year of the affected budget.
        fiscal_year: String,
        /// The overrun category, or `None` for the salary pool.
        category: Option<Category>,
        /// Amount by which the allocation was exceeded.
        overage: Decimal,
    },
}

impl EngineEvent {
    /// Stable event name for logging and routing.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PayrollProcessed { .. } => "payroll_processed",
            Self::TaskSettled { .. } => "task_settled",
            Self::BudgetOverrun { .. } => "budget_overrun",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_event_names() {
        let event = EngineEvent::BudgetOverrun {
            fiscal_year: "2026-2027".to_string(),
            category: Some(Category::Water),
            overage: dec!(2_500),
        };
        assert_eq!(event.name(), "budget_overrun");
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = EngineEvent::PayrollProcessed {
            fiscal_year: "2026-2027".to_string(),
            month: 7,
            year: 2026,
            total_amount: dec!(55_000),
            engineer_count: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "payroll_processed");
        assert_eq!(json["month"], 7);
    }
}
