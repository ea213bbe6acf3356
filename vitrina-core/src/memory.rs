use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

use crate::gateway::{BuildingStore, ExhibitStore, Gateway, HistoryStore, LocationStore};
use crate::model::{
    Building, BuildingId, Exhibit, ExhibitId, HistoryId, HistoryRecord, LifecycleStatus, Location,
    LocationDraft, LocationId,
};

/// Individual gateway calls, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListLocations,
    CreateLocation,
    UpdateLocation,
    GetExhibit,
    SetLifecycleStatus,
    AppendHistory,
    ListHistory,
    ListBuildings,
    GetBuilding,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ListLocations => "list_locations",
            Operation::CreateLocation => "create_location",
            Operation::UpdateLocation => "update_location",
            Operation::GetExhibit => "get_exhibit",
            Operation::SetLifecycleStatus => "set_lifecycle_status",
            Operation::AppendHistory => "append_history",
            Operation::ListHistory => "list_history",
            Operation::ListBuildings => "list_buildings",
            Operation::GetBuilding => "get_building",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("injected failure in {0}")]
    Injected(Operation),

    #[error("location {0} not found")]
    LocationNotFound(LocationId),

    #[error("exhibit {0} not found")]
    ExhibitNotFound(ExhibitId),
}

#[derive(Debug, Default)]
struct State {
    exhibits: BTreeMap<ExhibitId, Exhibit>,
    locations: BTreeMap<LocationId, Location>,
    history: Vec<HistoryRecord>,
    buildings: BTreeMap<BuildingId, Building>,
    next_location_id: LocationId,
    next_history_id: HistoryId,
    location_writes: usize,
}

/// An in-memory backend holding all four collections.
///
/// Useful for testing and as a reference implementation. Any operation can be
/// made to fail with [`MemoryGateway::fail`].
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: RwLock<State>,
    failing: RwLock<HashSet<Operation>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_exhibit(&self, exhibit: Exhibit) {
        self.state.write().unwrap().exhibits.insert(exhibit.id, exhibit);
    }

    pub fn insert_building(&self, building: Building) {
        self.state.write().unwrap().buildings.insert(building.id, building);
    }

    /// Seeds a location without counting it as a write.
    pub fn insert_location(&self, location: Location) {
        let mut state = self.state.write().unwrap();
        state.next_location_id = state.next_location_id.max(location.id);
        state.locations.insert(location.id, location);
    }

    /// Makes every subsequent call of `operation` fail until [`recover`](Self::recover).
    pub fn fail(&self, operation: Operation) {
        self.failing.write().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.failing.write().unwrap().remove(&operation);
    }

    pub fn exhibit(&self, id: ExhibitId) -> Option<Exhibit> {
        self.state.read().unwrap().exhibits.get(&id).cloned()
    }

    pub fn locations(&self) -> Vec<Location> {
        self.state.read().unwrap().locations.values().cloned().collect()
    }

    pub fn history(&self) -> Vec<HistoryRecord> {
        self.state.read().unwrap().history.clone()
    }

    /// Number of successful location creates and updates.
    pub fn location_writes(&self) -> usize {
        self.state.read().unwrap().location_writes
    }

    fn check(&self, operation: Operation) -> Result<(), MemoryError> {
        if self.failing.read().unwrap().contains(&operation) {
            debug!(%operation, "injected failure");
            return Err(MemoryError::Injected(operation));
        }
        Ok(())
    }
}

impl Gateway for MemoryGateway {
    type Error = MemoryError;
}

impl LocationStore for MemoryGateway {
    async fn list_locations(&self) -> Result<Vec<Location>, Self::Error> {
        self.check(Operation::ListLocations)?;
        Ok(self.locations())
    }

    async fn create_location(&self, draft: &LocationDraft) -> Result<Location, Self::Error> {
        self.check(Operation::CreateLocation)?;
        let mut state = self.state.write().unwrap();
        state.next_location_id += 1;
        let location = draft.clone().into_location(state.next_location_id);
        state.locations.insert(location.id, location.clone());
        state.location_writes += 1;
        Ok(location)
    }

    async fn update_location(
        &self,
        id: LocationId,
        draft: &LocationDraft,
    ) -> Result<Location, Self::Error> {
        self.check(Operation::UpdateLocation)?;
        let mut state = self.state.write().unwrap();
        let slot = state
            .locations
            .get_mut(&id)
            .ok_or(MemoryError::LocationNotFound(id))?;
        *slot = draft.clone().into_location(id);
        let location = slot.clone();
        state.location_writes += 1;
        Ok(location)
    }
}

impl ExhibitStore for MemoryGateway {
    async fn get_exhibit(&self, id: ExhibitId) -> Result<Option<Exhibit>, Self::Error> {
        self.check(Operation::GetExhibit)?;
        Ok(self.exhibit(id))
    }

    async fn set_lifecycle_status(
        &self,
        id: ExhibitId,
        status: LifecycleStatus,
    ) -> Result<Exhibit, Self::Error> {
        self.check(Operation::SetLifecycleStatus)?;
        let mut state = self.state.write().unwrap();
        let exhibit = state
            .exhibits
            .get_mut(&id)
            .ok_or(MemoryError::ExhibitNotFound(id))?;
        exhibit.lifecycle = status;
        Ok(exhibit.clone())
    }
}

impl HistoryStore for MemoryGateway {
    async fn append_history(&self, record: &HistoryRecord) -> Result<HistoryRecord, Self::Error> {
        self.check(Operation::AppendHistory)?;
        let mut state = self.state.write().unwrap();
        state.next_history_id += 1;
        let mut stored = record.clone();
        stored.id = Some(state.next_history_id);
        state.history.push(stored.clone());
        Ok(stored)
    }

    async fn list_history(&self) -> Result<Vec<HistoryRecord>, Self::Error> {
        self.check(Operation::ListHistory)?;
        Ok(self.history())
    }
}

impl BuildingStore for MemoryGateway {
    async fn list_buildings(&self) -> Result<Vec<Building>, Self::Error> {
        self.check(Operation::ListBuildings)?;
        Ok(self.state.read().unwrap().buildings.values().cloned().collect())
    }

    async fn get_building(&self, id: BuildingId) -> Result<Option<Building>, Self::Error> {
        self.check(Operation::GetBuilding)?;
        Ok(self.state.read().unwrap().buildings.get(&id).cloned())
    }
}
