use std::collections::HashMap;

use chrono::{DateTime, Utc};
use vitrina_core::{Building, BuildingId, Exhibit, HistoryRecord, Placement, PlacementSnapshot};

/// Buildings keyed by id, for bounds checks and display names.
#[derive(Debug, Clone, Default)]
pub struct BuildingIndex {
    buildings: HashMap<BuildingId, Building>,
}

impl BuildingIndex {
    pub fn new(buildings: impl IntoIterator<Item = Building>) -> Self {
        Self {
            buildings: buildings.into_iter().map(|b| (b.id, b)).collect(),
        }
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    /// Display name, or a generic label for buildings that no longer exist.
    pub fn name(&self, id: BuildingId) -> String {
        match self.buildings.get(&id) {
            Some(building) => building.name.clone(),
            None => format!("Bino {}", id),
        }
    }

    pub fn snapshot(&self, placement: &Placement) -> PlacementSnapshot {
        PlacementSnapshot {
            building: placement.building,
            building_name: self.name(placement.building),
            floor: placement.floor,
            room: placement.room,
            showcase: placement.showcase,
            shelf: placement.shelf,
        }
    }
}

/// Everything describing one move, before it is frozen into a record.
#[derive(Debug, Clone, Copy)]
pub struct Transfer<'a> {
    pub exhibit: &'a Exhibit,
    pub from: Option<&'a Placement>,
    pub to: &'a Placement,
    pub reason: &'a str,
    pub responsible: &'a str,
    pub note: Option<&'a str>,
}

/// Builds the audit record for `transfer`, stamped with the current time.
pub fn project(transfer: &Transfer<'_>, buildings: &BuildingIndex) -> HistoryRecord {
    project_at(transfer, buildings, Utc::now())
}

pub fn project_at(
    transfer: &Transfer<'_>,
    buildings: &BuildingIndex,
    at: DateTime<Utc>,
) -> HistoryRecord {
    HistoryRecord {
        id: None,
        exhibit: transfer.exhibit.id,
        exhibit_name: transfer.exhibit.name.clone(),
        reason: transfer.reason.to_string(),
        note: transfer.note.map(str::to_string),
        recorded_at: at,
        responsible: transfer.responsible.to_string(),
        from: transfer.from.map(|placement| buildings.snapshot(placement)),
        to: buildings.snapshot(transfer.to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn buildings() -> BuildingIndex {
        BuildingIndex::new([
            Building {
                id: 1,
                name: "Asosiy bino".to_string(),
                floors: 3,
                rooms: 10,
                showcases: 5,
                shelves: 5,
            },
            Building {
                id: 2,
                name: "Fond ombori".to_string(),
                floors: 1,
                rooms: 4,
                showcases: 2,
                shelves: 8,
            },
        ])
    }

    #[test]
    fn first_placement_has_no_origin() {
        let exhibit = Exhibit::new(11, "Sopol lagan", 1);
        let to = Placement::new(1, 2, 5, 1, 3);
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();

        let record = project_at(
            &Transfer {
                exhibit: &exhibit,
                from: None,
                to: &to,
                reason: "Yangi eksponat qo'shildi",
                responsible: "A. Karimov",
                note: None,
            },
            &buildings(),
            at,
        );

        assert_eq!(record.id, None);
        assert_eq!(record.exhibit, 11);
        assert_eq!(record.exhibit_name, "Sopol lagan");
        assert!(record.is_first_placement());
        assert_eq!(record.to.building_name, "Asosiy bino");
        assert!(record.to.matches(&to));
        assert_eq!(record.recorded_at, at);
    }

    #[test]
    fn move_snapshots_both_sides() {
        let exhibit = Exhibit::new(11, "Sopol lagan", 1);
        let from = Placement::new(1, 2, 5, 1, 3);
        let to = Placement::new(2, 1, 1, 1, 1);

        let record = project(
            &Transfer {
                exhibit: &exhibit,
                from: Some(&from),
                to: &to,
                reason: "Remont ishlari",
                responsible: "A. Karimov",
                note: Some("Vitrina oynasi almashtiriladi"),
            },
            &buildings(),
        );

        let origin = record.from.as_ref().unwrap();
        assert_eq!(origin.building_name, "Asosiy bino");
        assert!(origin.matches(&from));
        assert_eq!(record.to.building_name, "Fond ombori");
        assert_eq!(record.note.as_deref(), Some("Vitrina oynasi almashtiriladi"));
    }

    #[test]
    fn missing_building_gets_generic_label() {
        let snapshot = buildings().snapshot(&Placement::new(9, 1, 1, 1, 1));
        assert_eq!(snapshot.building, 9);
        assert_eq!(snapshot.building_name, "Bino 9");
    }
}
