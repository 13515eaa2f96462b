//! Property-based tests for the category allocator.
//!
//! These validate the conservation invariant over randomized
//! reserve/settle/release sequences.

use chrono::NaiveDate;
use nivaran_shared::types::AdminId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocator::{CategoryAllocator, Reservation};
use super::service::BudgetService;
use super::types::{BudgetRecord, Category, CreateBudgetInput};

const ALLOCATED: i64 = 100_000;

/// One step of an allocator workload.
#[derive(Debug, Clone)]
enum Op {
    Reserve(i64),
    /// Settle the oldest open reservation at `percent` of its amount
    /// (may exceed 100, producing an overrun).
    Settle(u32),
    /// Release the oldest open reservation.
    Release,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..30_000).prop_map(Op::Reserve),
        (0u32..150).prop_map(Op::Settle),
        Just(Op::Release),
    ]
}

fn make_budget() -> BudgetRecord {
    let mut record = BudgetService::create(CreateBudgetInput {
        fiscal_year: "2026-2027".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
        total_allocated: Decimal::from(ALLOCATED * 2),
        salary_allocated: Decimal::ZERO,
        operational_allocated: Decimal::from(ALLOCATED * 2),
        operational_reserve: Decimal::ZERO,
        category_allocations: vec![(Category::Water, Decimal::from(ALLOCATED))],
        created_by: AdminId::new(),
    })
    .unwrap();
    BudgetService::activate(&mut record).unwrap();
    record
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Over any workload, pending never goes negative, and until a
    /// settlement overruns its reservation, spent + pending stays within
    /// the allocation.
    #[test]
    fn prop_conservation_holds(ops in proptest::collection::vec(arb_op(), 1..60)) {
        let mut record = make_budget();
        let mut open: Vec<Reservation> = Vec::new();
        let mut overrun_seen = false;

        for op in ops {
            match op {
                Op::Reserve(amount) => {
                    if let Ok(r) = CategoryAllocator::reserve(
                        &mut record,
                        Category::Water,
                        Decimal::from(amount),
                    ) {
                        open.push(r);
                    }
                }
                Op::Settle(percent) => {
                    if open.is_empty() {
                        continue;
                    }
                    let r = open.remove(0);
                    let actual = (r.amount() * Decimal::from(percent) / Decimal::ONE_HUNDRED)
                        .round_dp(2);
                    let settlement =
                        CategoryAllocator::settle(&mut record, &r, actual).unwrap();
                    if settlement.overrun.is_some() {
                        overrun_seen = true;
                    }
                }
                Op::Release => {
                    if open.is_empty() {
                        continue;
                    }
                    let r = open.remove(0);
                    CategoryAllocator::release(&mut record, &r);
                }
            }

            let pool = record.category(Category::Water);
            prop_assert!(pool.pending >= Decimal::ZERO);
            prop_assert!(pool.spent >= Decimal::ZERO);
            if !overrun_seen {
                prop_assert!(pool.spent + pool.pending <= pool.allocated);
            }
        }
    }

    /// The settlement delta always equals reserved minus actual, and the
    /// pool absorbs exactly the actual spend.
    #[test]
    fn prop_settlement_delta_exact(reserved in 1i64..50_000, percent in 0u32..150) {
        let mut record = make_budget();
        let reservation = CategoryAllocator::reserve(
            &mut record,
            Category::Water,
            Decimal::from(reserved),
        );
        prop_assume!(reservation.is_ok());
        let reservation = reservation.unwrap();

        let actual = (reservation.amount() * Decimal::from(percent) / Decimal::ONE_HUNDRED)
            .round_dp(2);
        let settlement = CategoryAllocator::settle(&mut record, &reservation, actual).unwrap();

        prop_assert_eq!(settlement.returned, reservation.amount() - actual);
        prop_assert_eq!(record.category(Category::Water).spent, actual);
        prop_assert_eq!(record.category(Category::Water).pending, Decimal::ZERO);
        prop_assert_eq!(
            settlement.overrun.is_some(),
            actual > reservation.amount()
        );
    }
}
