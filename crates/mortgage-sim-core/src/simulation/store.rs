use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::SimulationError;
use crate::simulation::financing::FinancingSummary;
use crate::simulation::record::SimulationRecord;
use crate::SimulationResult;

/// Where computed simulations are kept once a caller decides to save them.
pub trait SimulationStore: Send + Sync {
    /// Persist a summary, assigning its identifier and timestamps.
    fn save(&self, summary: FinancingSummary) -> SimulationResult<SimulationRecord>;

    fn get(&self, id: u64) -> SimulationResult<Option<SimulationRecord>>;

    /// All simulations linked to `client_id`, oldest first. A client with no
    /// simulation is reported as `RecordNotFound`.
    fn find_by_client(&self, client_id: u64) -> SimulationResult<Vec<SimulationRecord>>;

    fn all(&self) -> SimulationResult<Vec<SimulationRecord>>;
}

#[derive(Default)]
struct StoreState {
    last_id: u64,
    records: BTreeMap<u64, SimulationRecord>,
}

/// Thread-safe, process-local simulation store.
///
/// Clones share the same underlying records.
#[derive(Default, Clone)]
pub struct InMemorySimulationStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemorySimulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> SimulationError {
    SimulationError::StorageError("simulation store lock poisoned".into())
}

impl SimulationStore for InMemorySimulationStore {
    fn save(&self, summary: FinancingSummary) -> SimulationResult<SimulationRecord> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let id = state.last_id + 1;
        let record = SimulationRecord::from_summary(id, Utc::now(), summary)?;
        state.last_id = id;
        state.records.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: u64) -> SimulationResult<Option<SimulationRecord>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.records.get(&id).cloned())
    }

    fn find_by_client(&self, client_id: u64) -> SimulationResult<Vec<SimulationRecord>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let found: Vec<SimulationRecord> = state
            .records
            .values()
            .filter(|r| r.summary.client_id == Some(client_id))
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(SimulationError::RecordNotFound(format!(
                "no simulation for client {client_id}"
            )));
        }
        Ok(found)
    }

    fn all(&self) -> SimulationResult<Vec<SimulationRecord>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.records.values().cloned().collect())
    }
}
