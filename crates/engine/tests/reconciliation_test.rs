//! End-to-end reconciliation flows through the engine.
//!
//! Covers the full assign → expense → review cycle, bulk confirmation
//! independence, and post-settlement adjustments.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use nivaran_core::budget::{Category, CategoryUsage, CreateBudgetInput};
use nivaran_core::events::EngineEvent;
use nivaran_core::reconcile::{ReconcileError, ReviewDecision};
use nivaran_engine::{
    AlwaysReviewable, BindingStore, BudgetManager, BudgetStore, EventSink, ReconciliationEngine,
};
use nivaran_shared::config::PolicyConfig;
use nivaran_shared::types::{AdminId, BindingId, EvidenceId, GrievanceId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sink that records events for assertions.
#[derive(Default)]
struct RecordingSink(Mutex<Vec<EngineEvent>>);

impl RecordingSink {
    fn events(&self) -> Vec<EngineEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &EngineEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

struct Harness {
    manager: BudgetManager,
    engine: ReconciliationEngine,
    sink: Arc<RecordingSink>,
    admin: AdminId,
}

impl Harness {
    async fn water(&self) -> CategoryUsage {
        let summary = self.manager.summary().await.unwrap();
        summary
            .categories
            .into_iter()
            .find(|c| c.category == Category::Water)
            .unwrap()
    }
}

async fn setup(policy: PolicyConfig) -> Harness {
    let budgets = Arc::new(BudgetStore::new());
    let bindings = Arc::new(BindingStore::new());
    let sink = Arc::new(RecordingSink::default());
    let manager = BudgetManager::new(Arc::clone(&budgets), Arc::clone(&bindings));
    let engine = ReconciliationEngine::new(
        budgets,
        bindings,
        Arc::new(AlwaysReviewable),
        sink.clone(),
        policy,
    );
    let admin = AdminId::new();

    manager
        .create_budget(CreateBudgetInput {
            fiscal_year: "2026-2027".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
            total_allocated: dec!(1_000_000),
            salary_allocated: dec!(400_000),
            operational_allocated: dec!(600_000),
            operational_reserve: dec!(0),
            category_allocations: vec![(Category::Water, dec!(100_000))],
            created_by: admin,
        })
        .unwrap();
    manager.activate_budget("2026-2027").await.unwrap();

    Harness {
        manager,
        engine,
        sink,
        admin,
    }
}

async fn assign_with_expenses(
    harness: &Harness,
    amount: Decimal,
    expenses: &[Decimal],
) -> BindingId {
    let binding_id = harness
        .manager
        .assign_budget(GrievanceId::new(), Category::Water, amount)
        .await
        .unwrap();
    for (i, expense) in expenses.iter().enumerate() {
        harness
            .engine
            .record_expense(binding_id, &format!("material {i}"), *expense)
            .unwrap();
    }
    binding_id
}

#[tokio::test]
async fn test_approve_settles_and_credits_delta() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id =
        assign_with_expenses(&harness, dec!(20_000), &[dec!(9_000), dec!(6_000)]).await;

    let outcome = harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Approve, harness.admin, None)
        .await
        .unwrap();

    assert_eq!(outcome.actual_spent, dec!(15_000));
    assert_eq!(outcome.returned, dec!(5_000));
    assert!(outcome.overrun.is_none());

    let water = harness.water().await;
    assert_eq!(water.spent, dec!(15_000));
    assert_eq!(water.pending, dec!(0));

    // 600_000 - 15_000 settled spend; the 5_000 unspent delta is back.
    let summary = harness.manager.summary().await.unwrap();
    assert_eq!(summary.operational_available, dec!(585_000));

    let events = harness.sink.events();
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::TaskSettled { actual_spent, .. }] if *actual_spent == dec!(15_000)
    ));
}

#[tokio::test]
async fn test_approve_is_terminal() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id = assign_with_expenses(&harness, dec!(10_000), &[dec!(7_000)]).await;

    harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Approve, harness.admin, None)
        .await
        .unwrap();

    let result = harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Approve, harness.admin, None)
        .await;
    assert!(matches!(result, Err(ReconcileError::Binding(_))));

    // The rejected double confirmation must not have double-settled.
    let water = harness.water().await;
    assert_eq!(water.spent, dec!(7_000));
    assert_eq!(water.pending, dec!(0));
}

#[tokio::test]
async fn test_overspend_settles_with_overrun_warning() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id = assign_with_expenses(&harness, dec!(10_000), &[dec!(12_500)]).await;

    let outcome = harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Approve, harness.admin, None)
        .await
        .unwrap();

    assert_eq!(outcome.returned, dec!(-2_500));
    assert_eq!(outcome.overrun, Some(dec!(2_500)));

    let events = harness.sink.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[1],
        EngineEvent::BudgetOverrun { category: Some(Category::Water), overage, .. }
            if *overage == dec!(2_500)
    ));
}

#[tokio::test]
async fn test_reject_releases_full_reservation() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id = assign_with_expenses(&harness, dec!(20_000), &[dec!(5_000)]).await;

    let outcome = harness
        .engine
        .confirm_single(
            binding_id,
            ReviewDecision::Reject,
            harness.admin,
            Some("work not acceptable".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(outcome.actual_spent, dec!(0));
    assert_eq!(outcome.returned, dec!(20_000));

    let water = harness.water().await;
    assert_eq!(water.spent, dec!(0));
    assert_eq!(water.pending, dec!(0));
    assert_eq!(water.available, dec!(100_000));
}

#[tokio::test]
async fn test_reject_without_notes_is_rejected() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id = assign_with_expenses(&harness, dec!(20_000), &[]).await;

    let result = harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Reject, harness.admin, None)
        .await;
    assert!(matches!(result, Err(ReconcileError::NotesRequired(_))));

    // Nothing moved, nothing emitted.
    let water = harness.water().await;
    assert_eq!(water.pending, dec!(20_000));
    assert!(harness.sink.events().is_empty());
}

#[tokio::test]
async fn test_rework_changes_nothing_monetary() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id = assign_with_expenses(&harness, dec!(20_000), &[dec!(5_000)]).await;

    let outcome = harness
        .engine
        .confirm_single(
            binding_id,
            ReviewDecision::Rework,
            harness.admin,
            Some("redo the joint sealing".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(outcome.returned, dec!(0));
    assert!(harness.sink.events().is_empty());

    // The binding stays reserved and keeps accepting expenses.
    harness
        .engine
        .record_expense(binding_id, "sealant", dec!(1_000))
        .unwrap();
    let water = harness.water().await;
    assert_eq!(water.pending, dec!(20_000));
}

#[tokio::test]
async fn test_confirm_all_is_independent_per_binding() {
    let harness = setup(PolicyConfig::default()).await;
    let _b1 = assign_with_expenses(&harness, dec!(10_000), &[dec!(4_000)]).await;
    let b2 = assign_with_expenses(&harness, dec!(10_000), &[dec!(5_000)]).await;
    let _b3 = assign_with_expenses(&harness, dec!(10_000), &[dec!(6_000)]).await;

    // Binding #2 is settled by a single confirmation first; the bulk run
    // must settle #1 and #3 and treat #2 as a no-op.
    harness
        .engine
        .confirm_single(b2, ReviewDecision::Approve, harness.admin, None)
        .await
        .unwrap();

    let outcome = harness.engine.confirm_all(harness.admin, None).await;

    assert_eq!(outcome.confirmed_count, 2);
    assert_eq!(outcome.total_count, 2);
    assert!(outcome.per_binding_errors.is_empty());
    assert_eq!(outcome.total_spent, dec!(10_000));
    assert_eq!(outcome.total_returned, dec!(10_000));

    // Every binding settled exactly once.
    let water = harness.water().await;
    assert_eq!(water.spent, dec!(15_000));
    assert_eq!(water.pending, dec!(0));
}

#[tokio::test]
async fn test_confirm_all_collects_per_binding_failures() {
    // With the evidence policy on, bindings without bills fail inside the
    // batch without aborting it.
    let harness = setup(PolicyConfig {
        require_bill_evidence: true,
    })
    .await;
    let with_bill = assign_with_expenses(&harness, dec!(10_000), &[dec!(4_000)]).await;
    let without_bill = assign_with_expenses(&harness, dec!(10_000), &[dec!(5_000)]).await;
    harness
        .engine
        .attach_evidence(with_bill, EvidenceId::new())
        .unwrap();

    let outcome = harness.engine.confirm_all(harness.admin, None).await;

    assert_eq!(outcome.total_count, 2);
    assert_eq!(outcome.confirmed_count, 1);
    assert_eq!(outcome.per_binding_errors.len(), 1);
    assert_eq!(outcome.per_binding_errors[0].binding_id, without_bill);
    assert_eq!(outcome.per_binding_errors[0].code, "EVIDENCE_REQUIRED");
    assert_eq!(outcome.total_spent, dec!(4_000));
}

#[tokio::test]
async fn test_concurrent_single_and_bulk_settle_each_binding_once() {
    let harness = setup(PolicyConfig::default()).await;
    let _b1 = assign_with_expenses(&harness, dec!(10_000), &[dec!(4_000)]).await;
    let b2 = assign_with_expenses(&harness, dec!(10_000), &[dec!(5_000)]).await;
    let _b3 = assign_with_expenses(&harness, dec!(10_000), &[dec!(6_000)]).await;

    let engine = &harness.engine;
    let admin = harness.admin;
    let (single, bulk) = tokio::join!(
        engine.confirm_single(b2, ReviewDecision::Approve, admin, None),
        engine.confirm_all(admin, None),
    );

    // Whichever side won binding #2, exactly three settlements happened:
    // either the batch skipped/errored it or the single call lost.
    assert_eq!(bulk.confirmed_count + usize::from(single.is_ok()), 3);

    let water = harness.water().await;
    assert_eq!(water.spent, dec!(15_000));
    assert_eq!(water.pending, dec!(0));
}

#[tokio::test]
async fn test_adjustment_corrects_settled_binding() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id = assign_with_expenses(&harness, dec!(10_000), &[dec!(7_000)]).await;

    // A live binding cannot be adjusted.
    let premature = harness
        .engine
        .record_adjustment(binding_id, dec!(-500), "typo in bill", harness.admin)
        .await;
    assert!(matches!(premature, Err(ReconcileError::NotSettled(_))));

    harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Approve, harness.admin, None)
        .await
        .unwrap();

    let entry = harness
        .engine
        .record_adjustment(binding_id, dec!(-500), "bill double-counted", harness.admin)
        .await
        .unwrap();
    assert_eq!(entry.delta, dec!(-500));

    let water = harness.water().await;
    assert_eq!(water.spent, dec!(6_500));

    let log = harness.engine.adjustments_for(binding_id).await;
    assert_eq!(log.len(), 1);

    // Adjustments never reopen the binding.
    let rejected = harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Approve, harness.admin, None)
        .await;
    assert!(rejected.is_err());
}

#[tokio::test]
async fn test_adjustment_cannot_drive_spend_negative() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id = assign_with_expenses(&harness, dec!(10_000), &[dec!(1_000)]).await;
    harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Approve, harness.admin, None)
        .await
        .unwrap();

    let result = harness
        .engine
        .record_adjustment(binding_id, dec!(-2_000), "overcorrection", harness.admin)
        .await;
    assert!(matches!(
        result,
        Err(ReconcileError::AdjustmentOutOfRange { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_assignment_is_rejected() {
    let harness = setup(PolicyConfig::default()).await;
    let grievance = GrievanceId::new();
    harness
        .manager
        .assign_budget(grievance, Category::Water, dec!(5_000))
        .await
        .unwrap();

    let result = harness
        .manager
        .assign_budget(grievance, Category::Water, dec!(5_000))
        .await;
    assert!(result.is_err());

    // Only the first reservation holds funds.
    let water = harness.water().await;
    assert_eq!(water.pending, dec!(5_000));
    assert_eq!(water.grievance_count, 1);
}

#[tokio::test]
async fn test_expenses_frozen_after_settlement() {
    let harness = setup(PolicyConfig::default()).await;
    let binding_id = assign_with_expenses(&harness, dec!(10_000), &[dec!(2_000)]).await;
    harness
        .engine
        .confirm_single(binding_id, ReviewDecision::Approve, harness.admin, None)
        .await
        .unwrap();

    let late = harness
        .engine
        .record_expense(binding_id, "late material", dec!(100));
    assert!(matches!(late, Err(ReconcileError::Binding(_))));
}
