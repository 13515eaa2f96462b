//! Event sink seam for the notification collaborator.

use nivaran_core::events::EngineEvent;

/// Receives engine events after the owning lock has been released.
///
/// Implementations must not block; the engine emits synchronously on the
/// request path. The notification collaborator decides what becomes an
/// email or a dashboard toast.
pub trait EventSink: Send + Sync {
    /// Delivers one event.
    fn emit(&self, event: &EngineEvent);
}

/// Default sink that logs events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &EngineEvent) {
        match event {
            EngineEvent::PayrollProcessed {
                fiscal_year,
                month,
                year,
                total_amount,
                engineer_count,
            } => {
                tracing::info!(
                    %fiscal_year,
                    month,
                    year,
                    %total_amount,
                    engineer_count,
                    "payroll processed"
                );
            }
            EngineEvent::TaskSettled {
                fiscal_year,
                binding_id,
                grievance_id,
                category,
                reserved,
                actual_spent,
                returned,
            } => {
                tracing::info!(
                    %fiscal_year,
                    %binding_id,
                    %grievance_id,
                    %category,
                    %reserved,
                    %actual_spent,
                    %returned,
                    "task settled"
                );
            }
            EngineEvent::BudgetOverrun {
                fiscal_year,
                category,
                overage,
            } => {
                tracing::warn!(%fiscal_year, ?category, %overage, "budget overrun");
            }
        }
    }
}
