//! Binding store: grievance budget bindings keyed by binding id, with a
//! grievance-id index enforcing one binding per grievance.

use dashmap::DashMap;
use nivaran_core::binding::{BindingError, BindingState, GrievanceBudgetBinding};
use nivaran_shared::types::{BindingId, GrievanceId};

/// Store of grievance budget bindings.
///
/// Reads return clones; mutations go through [`BindingStore::with_mut`],
/// which holds the entry exclusively for the duration of the closure.
/// Settlement paths call `with_mut` while also holding the owning
/// budget's lock (budget first, then entry) so pool totals and binding
/// state move together; closures must never block.
pub struct BindingStore {
    bindings: DashMap<BindingId, GrievanceBudgetBinding>,
    by_grievance: DashMap<GrievanceId, BindingId>,
}

impl Default for BindingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: DashMap::new(),
            by_grievance: DashMap::new(),
        }
    }

    /// Inserts a new binding.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateGrievance` if the grievance already has a
    /// binding.
    pub fn insert(&self, binding: GrievanceBudgetBinding) -> Result<(), BindingError> {
        match self.by_grievance.entry(binding.grievance_id) {
            dashmap::Entry::Occupied(_) => {
                Err(BindingError::DuplicateGrievance(binding.grievance_id))
            }
            dashmap::Entry::Vacant(entry) => {
                entry.insert(binding.id);
                self.bindings.insert(binding.id, binding);
                Ok(())
            }
        }
    }

    /// Returns a snapshot of a binding.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown binding id.
    pub fn get(&self, binding_id: BindingId) -> Result<GrievanceBudgetBinding, BindingError> {
        self.bindings
            .get(&binding_id)
            .map(|entry| entry.value().clone())
            .ok_or(BindingError::NotFound(binding_id))
    }

    /// The binding assigned to a grievance, if any.
    #[must_use]
    pub fn binding_for_grievance(&self, grievance_id: GrievanceId) -> Option<BindingId> {
        self.by_grievance.get(&grievance_id).map(|entry| *entry.value())
    }

    /// Runs a closure with exclusive access to a binding.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` (converted into `E`) for an unknown binding
    /// id, or whatever the closure returns.
    pub fn with_mut<T, E, F>(&self, binding_id: BindingId, f: F) -> Result<T, E>
    where
        E: From<BindingError>,
        F: FnOnce(&mut GrievanceBudgetBinding) -> Result<T, E>,
    {
        let mut entry = self
            .bindings
            .get_mut(&binding_id)
            .ok_or(BindingError::NotFound(binding_id))?;
        f(entry.value_mut())
    }

    /// Snapshot of all bindings still holding a reservation.
    #[must_use]
    pub fn reserved(&self) -> Vec<(BindingId, GrievanceId)> {
        self.bindings
            .iter()
            .filter(|entry| entry.value().state == BindingState::Reserved)
            .map(|entry| (entry.value().id, entry.value().grievance_id))
            .collect()
    }

    /// Number of bindings in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if the store holds no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
