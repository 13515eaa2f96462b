//! Category allocator: reserve, settle, and release funds within a
//! category sub-pool.
//!
//! Every operation mutates a single [`BudgetRecord`] and enforces the
//! conservation invariant `spent + pending <= allocated` at reservation
//! time. Callers serialize mutations per record; see the engine crate.

use nivaran_shared::types::money::{validate_amount, validate_positive_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BudgetError;
use super::types::{BudgetRecord, BudgetStatus, Category};

/// A provisional hold of funds against a category.
///
/// Returned by [`CategoryAllocator::reserve`] and redeemed exactly once
/// by [`CategoryAllocator::settle`] or [`CategoryAllocator::release`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    category: Category,
    amount: Decimal,
}

impl Reservation {
    /// Reconstructs a reservation token from its persisted parts.
    #[must_use]
    pub const fn new(category: Category, amount: Decimal) -> Self {
        Self { category, amount }
    }

    /// The category the funds are held against.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// The reserved amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Outcome of settling a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// `reserved - actual`: credited back to the operational pool when
    /// positive, absorbed by it when negative.
    pub returned: Decimal,
    /// Overage when the actual spend exceeded the reservation.
    pub overrun: Option<Decimal>,
}

/// Stateless allocator over a budget record's category pools.
pub struct CategoryAllocator;

impl CategoryAllocator {
    /// Reserves funds against a category for an in-flight grievance.
    ///
    /// Requires an active budget, a configured category, and
    /// `amount <= allocated - spent - pending`. On success increments the
    /// category's `pending` and `grievance_count` and the operational
    /// pool's `pending`.
    ///
    /// # Errors
    ///
    /// `NotActive`, `CategoryNotConfigured`, `InsufficientFunds`, or a
    /// `Money` validation error. The record is unchanged on failure.
    pub fn reserve(
        record: &mut BudgetRecord,
        category: Category,
        amount: Decimal,
    ) -> Result<Reservation, BudgetError> {
        validate_positive_amount(amount)?;

        if !record.status.is_active() {
            return Err(BudgetError::NotActive(record.status));
        }

        let pool = record.category_mut(category);
        if !pool.is_configured() {
            return Err(BudgetError::CategoryNotConfigured(category));
        }

        let available = pool.available();
        if amount > available {
            return Err(BudgetError::InsufficientFunds {
                category,
                requested: amount,
                available,
            });
        }

        pool.pending += amount;
        pool.grievance_count += 1;
        record.operational_pool.pending += amount;
        record.touch();

        Ok(Reservation { category, amount })
    }

    /// Settles a reservation against the actual spend.
    ///
    /// Moves the reserved amount out of `pending` and books the actual
    /// spend against the category and the operational pool. The returned
    /// delta `reserved - actual` may be negative when the engineer
    /// overspent; the overage is absorbed and surfaced via
    /// [`Settlement::overrun`] rather than failing, since the work is
    /// already done.
    ///
    /// # Errors
    ///
    /// Returns a `Money` validation error for a malformed actual amount.
    /// The record is unchanged on failure.
    pub fn settle(
        record: &mut BudgetRecord,
        reservation: &Reservation,
        actual_spent: Decimal,
    ) -> Result<Settlement, BudgetError> {
        validate_amount(actual_spent)?;

        let pool = record.category_mut(reservation.category);
        pool.pending -= reservation.amount;
        pool.spent += actual_spent;

        record.operational_pool.pending -= reservation.amount;
        record.operational_pool.spent += actual_spent;
        record.touch();

        let returned = reservation.amount - actual_spent;
        let overrun = if actual_spent > reservation.amount {
            Some(actual_spent - reservation.amount)
        } else {
            None
        };

        Ok(Settlement { returned, overrun })
    }

    /// Cancels a reservation entirely, as if the assignment never
    /// happened. Unlike a rejected settlement this also reverts the
    /// grievance count.
    pub fn release(record: &mut BudgetRecord, reservation: &Reservation) {
        let pool = record.category_mut(reservation.category);
        pool.pending -= reservation.amount;
        pool.grievance_count = pool.grievance_count.saturating_sub(1);
        record.operational_pool.pending -= reservation.amount;
        record.touch();
    }

    /// Changes a category's allocation.
    ///
    /// # Errors
    ///
    /// `BelowCommitted` when the new allocation is below `spent + pending`,
    /// `CategoryAllocationsExceedPool` when the category allocations would
    /// no longer fit the operational pool, `NotActive` on a closed budget.
    /// The record is unchanged on failure.
    pub fn update_allocation(
        record: &mut BudgetRecord,
        category: Category,
        new_allocated: Decimal,
    ) -> Result<(), BudgetError> {
        validate_amount(new_allocated)?;

        if record.status == BudgetStatus::Closed {
            return Err(BudgetError::NotActive(record.status));
        }

        let committed = {
            let pool = record.category(category);
            pool.spent + pool.pending
        };
        if new_allocated < committed {
            return Err(BudgetError::BelowCommitted {
                category,
                committed,
                requested: new_allocated,
            });
        }

        let allocated_sum: Decimal = record
            .category_pools
            .iter()
            .map(|p| {
                if p.category == category {
                    new_allocated
                } else {
                    p.allocated
                }
            })
            .sum();
        if allocated_sum > record.operational_pool.allocated {
            return Err(BudgetError::CategoryAllocationsExceedPool {
                allocated_sum,
                pool: record.operational_pool.allocated,
            });
        }

        record.category_mut(category).allocated = new_allocated;
        record.touch();
        Ok(())
    }

    /// Funds available for new reservations in a category.
    #[must_use]
    pub fn available(record: &BudgetRecord, category: Category) -> Decimal {
        record.category(category).available()
    }

    /// Uncommitted funds in the operational pool.
    #[must_use]
    pub fn operational_available(record: &BudgetRecord) -> Decimal {
        record.operational_pool.available()
    }
}
