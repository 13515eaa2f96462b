//! Grievance budget binding: the per-work-order money record.

use chrono::{DateTime, Utc};
use nivaran_shared::types::money::validate_positive_amount;
use nivaran_shared::types::{BindingId, EvidenceId, GrievanceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::Category;

use super::error::BindingError;

/// Binding lifecycle state.
///
/// The only transition is Reserved → Settled; settlement is terminal.
/// Correcting a settled binding is an audit adjustment, never a state
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingState {
    /// Funds are held; expenses may accrue.
    Reserved,
    /// Reservation has been reconciled (immutable).
    Settled,
}

impl BindingState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::Settled => "settled",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reserved" => Some(Self::Reserved),
            "settled" => Some(Self::Settled),
            _ => None,
        }
    }

    /// Returns true once the binding can no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

impl std::fmt::Display for BindingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One expense logged by the engineer against a binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseEntry {
    /// What the money was spent on.
    pub description: String,
    /// Amount spent.
    pub amount: Decimal,
    /// When the expense was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Links a grievance to the funds reserved for it and the actual
/// expenses incurred while resolving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrievanceBudgetBinding {
    /// Binding ID.
    pub id: BindingId,
    /// The grievance this budget belongs to.
    pub grievance_id: GrievanceId,
    /// Fiscal year of the budget the funds were reserved against.
    pub fiscal_year: String,
    /// Category the reservation was made in.
    pub category: Category,
    /// Amount reserved at assignment time.
    pub reserved_amount: Decimal,
    /// Running sum of the expense breakdown.
    pub spent_amount: Decimal,
    /// Itemized expenses, append-only while reserved.
    pub expense_breakdown: Vec<ExpenseEntry>,
    /// Bill/receipt evidence references (deduplicated).
    pub bill_evidence: Vec<EvidenceId>,
    /// Lifecycle state.
    pub state: BindingState,
    /// When the binding was created (engineer assigned with budget).
    pub created_at: DateTime<Utc>,
    /// When the binding was settled, if it has been.
    pub settled_at: Option<DateTime<Utc>>,
}

impl GrievanceBudgetBinding {
    /// Creates a fresh binding in `Reserved` state.
    #[must_use]
    pub fn new(
        grievance_id: GrievanceId,
        fiscal_year: String,
        category: Category,
        reserved_amount: Decimal,
    ) -> Self {
        Self {
            id: BindingId::new(),
            grievance_id,
            fiscal_year,
            category,
            reserved_amount,
            spent_amount: Decimal::ZERO,
            expense_breakdown: Vec::new(),
            bill_evidence: Vec::new(),
            state: BindingState::Reserved,
            created_at: Utc::now(),
            settled_at: None,
        }
    }

    /// Appends an expense entry and updates the running total.
    ///
    /// # Errors
    ///
    /// `AlreadySettled` once the binding is settled, `EmptyDescription`
    /// for a blank description, or a `Money` validation error.
    pub fn add_expense(&mut self, description: &str, amount: Decimal) -> Result<(), BindingError> {
        if self.state.is_terminal() {
            return Err(BindingError::AlreadySettled(self.id));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(BindingError::EmptyDescription);
        }
        validate_positive_amount(amount)?;

        self.expense_breakdown.push(ExpenseEntry {
            description: description.to_string(),
            amount,
            recorded_at: Utc::now(),
        });
        self.spent_amount += amount;
        Ok(())
    }

    /// Attaches a bill evidence reference. Duplicate references are
    /// ignored (the evidence set has set semantics).
    ///
    /// # Errors
    ///
    /// `AlreadySettled` once the binding is settled.
    pub fn attach_evidence(&mut self, evidence: EvidenceId) -> Result<(), BindingError> {
        if self.state.is_terminal() {
            return Err(BindingError::AlreadySettled(self.id));
        }
        if !self.bill_evidence.contains(&evidence) {
            self.bill_evidence.push(evidence);
        }
        Ok(())
    }

    /// Transitions the binding to `Settled`. Terminal.
    ///
    /// # Errors
    ///
    /// `AlreadySettled` on a second settlement attempt.
    pub fn mark_settled(&mut self) -> Result<(), BindingError> {
        if self.state.is_terminal() {
            return Err(BindingError::AlreadySettled(self.id));
        }
        self.state = BindingState::Settled;
        self.settled_at = Some(Utc::now());
        Ok(())
    }
}
