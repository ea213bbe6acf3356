use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ExhibitId = u64;
pub type LocationId = u64;
pub type HistoryId = u64;
pub type BuildingId = u64;
pub type CategoryId = u64;

/// Whether an exhibit currently has a storage placement.
///
/// Only the relocation workflow changes this; catalog edits leave it alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStatus {
    #[default]
    Unplaced,
    Placed,
    Moved,
}

impl LifecycleStatus {
    pub fn is_placed(self) -> bool {
        !matches!(self, LifecycleStatus::Unplaced)
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStatus::Unplaced => write!(f, "unplaced"),
            LifecycleStatus::Placed => write!(f, "placed"),
            LifecycleStatus::Moved => write!(f, "moved"),
        }
    }
}

/// A catalogued physical object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exhibit {
    pub id: ExhibitId,
    pub name: String,
    pub material: Option<String>,
    pub category: CategoryId,
    pub sub_category: Option<u64>,
    pub period: Option<i32>,
    pub valuation: Option<String>,
    /// Physical condition, e.g. "Qoniqarli".
    pub condition: Option<String>,
    pub fund_type: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub lifecycle: LifecycleStatus,
}

impl Exhibit {
    /// Minimal exhibit with only the fields the relocation workflow reads.
    pub fn new(id: ExhibitId, name: impl Into<String>, category: CategoryId) -> Self {
        Self {
            id,
            name: name.into(),
            material: None,
            category,
            sub_category: None,
            period: None,
            valuation: None,
            condition: None,
            fund_type: None,
            description: None,
            lifecycle: LifecycleStatus::Unplaced,
        }
    }
}

/// One axis of a storage placement inside a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coordinate {
    Floor,
    Room,
    Showcase,
    Shelf,
}

impl Coordinate {
    pub const ALL: [Coordinate; 4] = [
        Coordinate::Floor,
        Coordinate::Room,
        Coordinate::Showcase,
        Coordinate::Shelf,
    ];
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Floor => write!(f, "floor"),
            Coordinate::Room => write!(f, "room"),
            Coordinate::Showcase => write!(f, "showcase"),
            Coordinate::Shelf => write!(f, "shelf"),
        }
    }
}

/// A storage slot: building plus 1-based floor/room/showcase/shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub building: BuildingId,
    pub floor: u32,
    pub room: u32,
    pub showcase: u32,
    pub shelf: u32,
}

impl Placement {
    pub fn new(building: BuildingId, floor: u32, room: u32, showcase: u32, shelf: u32) -> Self {
        Self {
            building,
            floor,
            room,
            showcase,
            shelf,
        }
    }

    pub fn get(&self, coordinate: Coordinate) -> u32 {
        match coordinate {
            Coordinate::Floor => self.floor,
            Coordinate::Room => self.room,
            Coordinate::Showcase => self.showcase,
            Coordinate::Shelf => self.shelf,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "building {} / floor {} / room {} / showcase {} / shelf {}",
            self.building, self.floor, self.room, self.showcase, self.shelf
        )
    }
}

/// Static reference data describing a building's capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub floors: u32,
    pub rooms: u32,
    pub showcases: u32,
    pub shelves: u32,
}

impl Building {
    pub fn bound(&self, coordinate: Coordinate) -> u32 {
        match coordinate {
            Coordinate::Floor => self.floors,
            Coordinate::Room => self.rooms,
            Coordinate::Showcase => self.showcases,
            Coordinate::Shelf => self.shelves,
        }
    }

    /// Returns the first coordinate of `placement` outside `1..=bound`.
    pub fn first_violation(&self, placement: &Placement) -> Option<(Coordinate, u32, u32)> {
        Coordinate::ALL.into_iter().find_map(|coordinate| {
            let value = placement.get(coordinate);
            let bound = self.bound(coordinate);
            (value == 0 || value > bound).then_some((coordinate, value, bound))
        })
    }
}

/// Current placement of exactly one exhibit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub exhibit: ExhibitId,
    #[serde(flatten)]
    pub placement: Placement,
    pub responsible: Option<String>,
    pub note: Option<String>,
    pub reason: Option<String>,
}

/// Payload for creating or updating a location record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDraft {
    pub exhibit: ExhibitId,
    #[serde(flatten)]
    pub placement: Placement,
    pub responsible: Option<String>,
    pub note: Option<String>,
    pub reason: Option<String>,
}

impl LocationDraft {
    pub fn into_location(self, id: LocationId) -> Location {
        Location {
            id,
            exhibit: self.exhibit,
            placement: self.placement,
            responsible: self.responsible,
            note: self.note,
            reason: self.reason,
        }
    }
}

/// Denormalized copy of a placement, frozen when the move happened.
///
/// Carries the building name rather than relying on the building record,
/// so the audit log stays readable after reference data changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementSnapshot {
    pub building: BuildingId,
    pub building_name: String,
    pub floor: u32,
    pub room: u32,
    pub showcase: u32,
    pub shelf: u32,
}

impl PlacementSnapshot {
    pub fn matches(&self, placement: &Placement) -> bool {
        self.building == placement.building
            && self.floor == placement.floor
            && self.room == placement.room
            && self.showcase == placement.showcase
            && self.shelf == placement.shelf
    }
}

impl fmt::Display for PlacementSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, floor {}, room {}, showcase {}, shelf {}",
            self.building_name, self.floor, self.room, self.showcase, self.shelf
        )
    }
}

/// Append-only audit entry describing one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Assigned by the backend; `None` until the record is persisted.
    pub id: Option<HistoryId>,
    pub exhibit: ExhibitId,
    pub exhibit_name: String,
    pub reason: String,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub responsible: String,
    /// `None` only for the first placement.
    pub from: Option<PlacementSnapshot>,
    pub to: PlacementSnapshot,
}

impl HistoryRecord {
    pub fn is_first_placement(&self) -> bool {
        self.from.is_none()
    }
}
