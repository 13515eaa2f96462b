//! Completed-task reconciliation: single and bulk confirmation,
//! expense logging, and post-settlement adjustments.

use std::sync::Arc;

use chrono::Utc;
use nivaran_core::binding::BindingState;
use nivaran_core::budget::{CategoryAllocator, Reservation};
use nivaran_core::events::EngineEvent;
use nivaran_core::reconcile::{
    AdjustmentEntry, BindingFailure, BulkConfirmOutcome, ConfirmOutcome, ReconcileError,
    ReviewAction, ReviewDecision, ReviewService,
};
use nivaran_shared::config::PolicyConfig;
use nivaran_shared::types::money::validate_positive_amount;
use nivaran_shared::types::{AdminId, BindingId, EvidenceId};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::events::EventSink;
use crate::grievance::GrievanceDirectory;
use crate::store::{BindingStore, BudgetStore};

/// Settles grievance budget bindings when admins review completed work.
pub struct ReconciliationEngine {
    budgets: Arc<BudgetStore>,
    bindings: Arc<BindingStore>,
    directory: Arc<dyn GrievanceDirectory>,
    events: Arc<dyn EventSink>,
    policy: PolicyConfig,
    adjustments: RwLock<Vec<AdjustmentEntry>>,
}

impl ReconciliationEngine {
    /// Creates an engine over shared stores and collaborator seams.
    #[must_use]
    pub fn new(
        budgets: Arc<BudgetStore>,
        bindings: Arc<BindingStore>,
        directory: Arc<dyn GrievanceDirectory>,
        events: Arc<dyn EventSink>,
        policy: PolicyConfig,
    ) -> Self {
        Self {
            budgets,
            bindings,
            directory,
            events,
            policy,
            adjustments: RwLock::new(Vec::new()),
        }
    }

    /// Logs an expense against a reserved binding.
    ///
    /// Expenses do not touch pool totals until settlement, so no budget
    /// lock is taken.
    ///
    /// # Errors
    ///
    /// `NotFound`, `AlreadySettled`, `EmptyDescription`, or a `Money`
    /// validation error.
    pub fn record_expense(
        &self,
        binding_id: BindingId,
        description: &str,
        amount: Decimal,
    ) -> Result<(), ReconcileError> {
        self.bindings.with_mut(binding_id, |binding| {
            binding
                .add_expense(description, amount)
                .map_err(ReconcileError::from)
        })
    }

    /// Attaches bill evidence to a reserved binding.
    ///
    /// # Errors
    ///
    /// `NotFound` or `AlreadySettled`.
    pub fn attach_evidence(
        &self,
        binding_id: BindingId,
        evidence: EvidenceId,
    ) -> Result<(), ReconcileError> {
        self.bindings.with_mut(binding_id, |binding| {
            binding
                .attach_evidence(evidence)
                .map_err(ReconcileError::from)
        })
    }

    /// Reviews one completed task.
    ///
    /// On approve the binding settles against the sum of its expense
    /// breakdown and the unspent delta returns to the operational pool;
    /// an overspend is absorbed and surfaced as a `BudgetOverrun` event.
    /// On reject the full reservation is released and the binding still
    /// settles. On rework nothing monetary happens; the caller relays
    /// the outcome to the grievance workflow, which reopens the task.
    ///
    /// # Errors
    ///
    /// `NotAwaitingReview`, `NotesRequired` (rework/reject),
    /// `EvidenceRequired` (policy), `AlreadySettled` on a concurrent
    /// double-confirm, or store lookup failures. The budget record is
    /// unchanged on failure.
    pub async fn confirm_single(
        &self,
        binding_id: BindingId,
        decision: ReviewDecision,
        admin: AdminId,
        notes: Option<String>,
    ) -> Result<ConfirmOutcome, ReconcileError> {
        let snapshot = self.bindings.get(binding_id)?;
        if !self.directory.is_awaiting_review(snapshot.grievance_id) {
            return Err(ReconcileError::NotAwaitingReview(snapshot.grievance_id));
        }

        let handle = self.budgets.get(&snapshot.fiscal_year)?;
        let mut record = handle.lock().await;

        let (outcome, events) = self.bindings.with_mut(binding_id, |binding| {
            let action =
                ReviewService::review(binding.id, binding.state, decision, admin, notes)?;
            let fiscal_year = binding.fiscal_year.clone();

            match action {
                ReviewAction::Approve { .. } => {
                    if self.policy.require_bill_evidence && binding.bill_evidence.is_empty() {
                        return Err(ReconcileError::EvidenceRequired(binding.id));
                    }
                    let actual = binding.spent_amount;
                    let reservation =
                        Reservation::new(binding.category, binding.reserved_amount);
                    let settlement =
                        CategoryAllocator::settle(&mut record, &reservation, actual)?;
                    binding.mark_settled()?;

                    let mut events = vec![EngineEvent::TaskSettled {
                        fiscal_year: fiscal_year.clone(),
                        binding_id: binding.id,
                        grievance_id: binding.grievance_id,
                        category: binding.category,
                        reserved: binding.reserved_amount,
                        actual_spent: actual,
                        returned: settlement.returned,
                    }];
                    if let Some(overage) = settlement.overrun {
                        events.push(EngineEvent::BudgetOverrun {
                            fiscal_year,
                            category: Some(binding.category),
                            overage,
                        });
                    }

                    Ok((
                        ConfirmOutcome {
                            binding_id: binding.id,
                            grievance_id: binding.grievance_id,
                            decision,
                            actual_spent: actual,
                            returned: settlement.returned,
                            overrun: settlement.overrun,
                        },
                        events,
                    ))
                }
                ReviewAction::Reject { .. } => {
                    let reservation =
                        Reservation::new(binding.category, binding.reserved_amount);
                    let settlement =
                        CategoryAllocator::settle(&mut record, &reservation, Decimal::ZERO)?;
                    binding.mark_settled()?;

                    let events = vec![EngineEvent::TaskSettled {
                        fiscal_year,
                        binding_id: binding.id,
                        grievance_id: binding.grievance_id,
                        category: binding.category,
                        reserved: binding.reserved_amount,
                        actual_spent: Decimal::ZERO,
                        returned: settlement.returned,
                    }];

                    Ok((
                        ConfirmOutcome {
                            binding_id: binding.id,
                            grievance_id: binding.grievance_id,
                            decision,
                            actual_spent: Decimal::ZERO,
                            returned: settlement.returned,
                            overrun: None,
                        },
                        events,
                    ))
                }
                ReviewAction::Rework { .. } => Ok((
                    ConfirmOutcome {
                        binding_id: binding.id,
                        grievance_id: binding.grievance_id,
                        decision,
                        actual_spent: Decimal::ZERO,
                        returned: Decimal::ZERO,
                        overrun: None,
                    },
                    Vec::new(),
                )),
            }
        })?;

        drop(record);
        for event in &events {
            self.events.emit(event);
        }
        Ok(outcome)
    }

    /// Approves every reserved binding whose grievance awaits review.
    ///
    /// Each binding settles in its own critical section: a binding
    /// settled concurrently by [`Self::confirm_single`] surfaces in
    /// `per_binding_errors` and never aborts the batch.
    pub async fn confirm_all(&self, admin: AdminId, notes: Option<String>) -> BulkConfirmOutcome {
        let candidates: Vec<_> = self
            .bindings
            .reserved()
            .into_iter()
            .filter(|(_, grievance_id)| self.directory.is_awaiting_review(*grievance_id))
            .collect();

        let total_count = candidates.len();
        let mut confirmed_count = 0;
        let mut total_returned = Decimal::ZERO;
        let mut total_spent = Decimal::ZERO;
        let mut per_binding_errors = Vec::new();

        for (binding_id, _) in candidates {
            match self
                .confirm_single(binding_id, ReviewDecision::Approve, admin, notes.clone())
                .await
            {
                Ok(outcome) => {
                    confirmed_count += 1;
                    total_returned += outcome.returned;
                    total_spent += outcome.actual_spent;
                }
                Err(error) => per_binding_errors.push(BindingFailure {
                    binding_id,
                    code: error.error_code().to_string(),
                    message: error.to_string(),
                }),
            }
        }

        tracing::info!(confirmed_count, total_count, "bulk confirmation finished");
        BulkConfirmOutcome {
            confirmed_count,
            total_count,
            total_returned,
            total_spent,
            per_binding_errors,
        }
    }

    /// Records a compensating correction against a settled binding.
    ///
    /// Settlement is terminal; a wrongly settled amount is fixed by an
    /// audit entry that shifts the category's (and operational pool's)
    /// spent total, never by reopening the binding.
    ///
    /// # Errors
    ///
    /// `ReasonRequired`, `NotSettled` for a live binding, a `Money`
    /// validation error for a malformed delta, or
    /// `AdjustmentOutOfRange` when the correction would drive spend
    /// negative.
    pub async fn record_adjustment(
        &self,
        binding_id: BindingId,
        delta: Decimal,
        reason: &str,
        admin: AdminId,
    ) -> Result<AdjustmentEntry, ReconcileError> {
        if reason.trim().is_empty() {
            return Err(ReconcileError::ReasonRequired);
        }
        validate_positive_amount(delta.abs())?;

        let snapshot = self.bindings.get(binding_id)?;
        if snapshot.state != BindingState::Settled {
            return Err(ReconcileError::NotSettled(binding_id));
        }

        let handle = self.budgets.get(&snapshot.fiscal_year)?;
        let mut record = handle.lock().await;

        let new_spent = record.category(snapshot.category).spent + delta;
        if new_spent < Decimal::ZERO {
            return Err(ReconcileError::AdjustmentOutOfRange { delta });
        }
        record.category_mut(snapshot.category).spent = new_spent;
        record.operational_pool.spent += delta;
        record.touch();
        drop(record);

        let entry = AdjustmentEntry {
            binding_id,
            delta,
            reason: reason.trim().to_string(),
            recorded_by: admin,
            recorded_at: Utc::now(),
        };
        self.adjustments.write().await.push(entry.clone());
        tracing::info!(%binding_id, %delta, "settlement adjustment recorded");
        Ok(entry)
    }

    /// Audit adjustments recorded against a binding.
    pub async fn adjustments_for(&self, binding_id: BindingId) -> Vec<AdjustmentEntry> {
        self.adjustments
            .read()
            .await
            .iter()
            .filter(|entry| entry.binding_id == binding_id)
            .cloned()
            .collect()
    }
}
