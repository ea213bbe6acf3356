//! Vitrina core types for the museum inventory backend.
//!
//! Core concepts:
//! - **Exhibit**: a catalogued physical object with a lifecycle status
//! - **Location**: the single current storage placement of an exhibit
//! - **HistoryRecord**: an immutable audit entry with denormalized snapshots
//! - **Gateway**: async traits over the remote resource collections
//!
//! [`MemoryGateway`] implements every collection in memory and supports
//! per-operation failure injection for tests.

mod access;
mod gateway;
mod memory;
mod model;

pub use access::{Role, Viewer};
pub use gateway::{BuildingStore, ExhibitStore, Gateway, HistoryStore, LocationStore, MuseumBackend};
pub use memory::{MemoryError, MemoryGateway, Operation};
pub use model::{
    Building, BuildingId, CategoryId, Coordinate, Exhibit, ExhibitId, HistoryId, HistoryRecord,
    LifecycleStatus, Location, LocationDraft, LocationId, Placement, PlacementSnapshot,
};
