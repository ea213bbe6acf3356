use std::future::Future;

use crate::model::{
    Building, BuildingId, Exhibit, ExhibitId, HistoryRecord, LifecycleStatus, Location,
    LocationDraft, LocationId,
};

/// Shared error type for a backend's resource collections.
///
/// The collections are independent remote resources with no transactional
/// envelope; each call either succeeds or fails on its own.
pub trait Gateway: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;
}

/// Location collection. Filtering by exhibit happens client-side.
pub trait LocationStore: Gateway {
    fn list_locations(&self) -> impl Future<Output = Result<Vec<Location>, Self::Error>> + Send;

    fn create_location(
        &self,
        draft: &LocationDraft,
    ) -> impl Future<Output = Result<Location, Self::Error>> + Send;

    /// Updates the record in place; the identifier never changes.
    fn update_location(
        &self,
        id: LocationId,
        draft: &LocationDraft,
    ) -> impl Future<Output = Result<Location, Self::Error>> + Send;
}

/// Exhibit (item object) collection.
pub trait ExhibitStore: Gateway {
    fn get_exhibit(
        &self,
        id: ExhibitId,
    ) -> impl Future<Output = Result<Option<Exhibit>, Self::Error>> + Send;

    fn set_lifecycle_status(
        &self,
        id: ExhibitId,
        status: LifecycleStatus,
    ) -> impl Future<Output = Result<Exhibit, Self::Error>> + Send;
}

/// Append-only history collection.
pub trait HistoryStore: Gateway {
    /// Persists the record and returns it with its backend identifier.
    fn append_history(
        &self,
        record: &HistoryRecord,
    ) -> impl Future<Output = Result<HistoryRecord, Self::Error>> + Send;

    fn list_history(&self) -> impl Future<Output = Result<Vec<HistoryRecord>, Self::Error>> + Send;
}

/// Read-only building reference data.
pub trait BuildingStore: Gateway {
    fn list_buildings(&self) -> impl Future<Output = Result<Vec<Building>, Self::Error>> + Send;

    fn get_building(
        &self,
        id: BuildingId,
    ) -> impl Future<Output = Result<Option<Building>, Self::Error>> + Send;
}

/// A backend exposing every collection the relocation workflow touches.
pub trait MuseumBackend: LocationStore + ExhibitStore + HistoryStore + BuildingStore {}

impl<G> MuseumBackend for G where G: LocationStore + ExhibitStore + HistoryStore + BuildingStore {}
