use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrina_core::{
    Building, BuildingId, Exhibit, ExhibitId, HistoryId, HistoryRecord, LifecycleStatus, Location,
    LocationDraft, LocationId, Placement, PlacementSnapshot,
};

use crate::error::RestError;

/// Every backend response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDto {
    pub id: LocationId,
    #[serde(flatten)]
    pub body: LocationPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub item_object_id: ExhibitId,
    pub building_id: BuildingId,
    pub floor: u32,
    pub room: u32,
    pub showcase: u32,
    pub polka: u32,
    #[serde(rename = "infoName", default, skip_serializing_if = "Option::is_none")]
    pub info_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "reasonForTransfer", default, skip_serializing_if = "Option::is_none")]
    pub reason_for_transfer: Option<String>,
}

impl From<&LocationDraft> for LocationPayload {
    fn from(draft: &LocationDraft) -> Self {
        Self {
            item_object_id: draft.exhibit,
            building_id: draft.placement.building,
            floor: draft.placement.floor,
            room: draft.placement.room,
            showcase: draft.placement.showcase,
            polka: draft.placement.shelf,
            info_name: draft.responsible.clone(),
            description: draft.note.clone(),
            reason_for_transfer: draft.reason.clone(),
        }
    }
}

impl From<LocationDto> for Location {
    fn from(dto: LocationDto) -> Self {
        let body = dto.body;
        Location {
            id: dto.id,
            exhibit: body.item_object_id,
            placement: Placement::new(
                body.building_id,
                body.floor,
                body.room,
                body.showcase,
                body.polka,
            ),
            responsible: body.info_name,
            note: body.description,
            reason: body.reason_for_transfer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExhibitDto {
    pub id: ExhibitId,
    pub name: String,
    #[serde(default)]
    pub material: Option<String>,
    pub category_id: u64,
    #[serde(default)]
    pub sub_category_id: Option<u64>,
    #[serde(default)]
    pub period: Option<i32>,
    #[serde(default)]
    pub price: Option<String>,
    /// Physical condition, not the placement lifecycle.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "fondType", default)]
    pub fond_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "lifecycleStatus", default)]
    pub lifecycle_status: Option<LifecycleStatus>,
}

impl From<ExhibitDto> for Exhibit {
    fn from(dto: ExhibitDto) -> Self {
        Exhibit {
            id: dto.id,
            name: dto.name,
            material: dto.material,
            category: dto.category_id,
            sub_category: dto.sub_category_id,
            period: dto.period,
            valuation: dto.price,
            condition: dto.status,
            fund_type: dto.fond_type,
            description: dto.description,
            lifecycle: dto.lifecycle_status.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LifecyclePatch {
    #[serde(rename = "lifecycleStatus")]
    pub lifecycle_status: LifecycleStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingDto {
    pub id: BuildingId,
    pub name: String,
    pub floors: u32,
    pub rooms: u32,
    pub showcase: u32,
    pub polkas: u32,
}

impl From<BuildingDto> for Building {
    fn from(dto: BuildingDto) -> Self {
        Building {
            id: dto.id,
            name: dto.name,
            floors: dto.floors,
            rooms: dto.rooms,
            showcases: dto.showcase,
            shelves: dto.polkas,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HistoryId>,
    pub data: HistoryData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryData {
    /// Exhibit id as a string.
    pub key: String,
    pub item_name: String,
    pub info: HistoryInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryInfo {
    pub from_location: Option<SnapshotDto>,
    pub to_location: SnapshotDto,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub responsible_person: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDto {
    #[serde(default)]
    pub building_id: Option<BuildingId>,
    pub building_name: String,
    pub floor: u32,
    pub room: u32,
    pub showcase: u32,
    pub shelf: u32,
}

impl From<&PlacementSnapshot> for SnapshotDto {
    fn from(snapshot: &PlacementSnapshot) -> Self {
        Self {
            building_id: Some(snapshot.building),
            building_name: snapshot.building_name.clone(),
            floor: snapshot.floor,
            room: snapshot.room,
            showcase: snapshot.showcase,
            shelf: snapshot.shelf,
        }
    }
}

impl From<SnapshotDto> for PlacementSnapshot {
    fn from(dto: SnapshotDto) -> Self {
        PlacementSnapshot {
            building: dto.building_id.unwrap_or_default(),
            building_name: dto.building_name,
            floor: dto.floor,
            room: dto.room,
            showcase: dto.showcase,
            shelf: dto.shelf,
        }
    }
}

impl From<&HistoryRecord> for HistoryDto {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            id: record.id,
            data: HistoryData {
                key: record.exhibit.to_string(),
                item_name: record.exhibit_name.clone(),
                info: HistoryInfo {
                    from_location: record.from.as_ref().map(SnapshotDto::from),
                    to_location: SnapshotDto::from(&record.to),
                    reason: record.reason.clone(),
                    description: record.note.clone(),
                    date: record.recorded_at,
                    responsible_person: record.responsible.clone(),
                },
            },
        }
    }
}

impl TryFrom<HistoryDto> for HistoryRecord {
    type Error = RestError;

    fn try_from(dto: HistoryDto) -> Result<Self, Self::Error> {
        let exhibit = dto
            .data
            .key
            .parse::<ExhibitId>()
            .map_err(|_| RestError::Malformed(format!("history key {:?}", dto.data.key)))?;
        let info = dto.data.info;

        Ok(HistoryRecord {
            id: dto.id,
            exhibit,
            exhibit_name: dto.data.item_name,
            reason: info.reason,
            note: info.description,
            recorded_at: info.date,
            responsible: info.responsible_person,
            from: info.from_location.map(PlacementSnapshot::from),
            to: PlacementSnapshot::from(info.to_location),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_from_backend_json() {
        let dto: LocationDto = serde_json::from_value(json!({
            "id": 12,
            "item_object_id": 5,
            "building_id": 2,
            "floor": 1,
            "room": 4,
            "showcase": 2,
            "polka": 3,
            "infoName": "A. Karimov",
            "reasonForTransfer": "Remont ishlari"
        }))
        .unwrap();

        let location = Location::from(dto);

        assert_eq!(location.id, 12);
        assert_eq!(location.exhibit, 5);
        assert_eq!(location.placement, Placement::new(2, 1, 4, 2, 3));
        assert_eq!(location.responsible.as_deref(), Some("A. Karimov"));
        assert_eq!(location.note, None);
        assert_eq!(location.reason.as_deref(), Some("Remont ishlari"));
    }

    #[test]
    fn location_payload_omits_empty_fields() {
        let draft = LocationDraft {
            exhibit: 5,
            placement: Placement::new(2, 1, 4, 2, 3),
            responsible: Some("A. Karimov".to_string()),
            note: None,
            reason: Some("Boshqa".to_string()),
        };

        let body = serde_json::to_value(LocationPayload::from(&draft)).unwrap();

        assert_eq!(
            body,
            json!({
                "item_object_id": 5,
                "building_id": 2,
                "floor": 1,
                "room": 4,
                "showcase": 2,
                "polka": 3,
                "infoName": "A. Karimov",
                "reasonForTransfer": "Boshqa"
            })
        );
    }

    #[test]
    fn exhibit_without_lifecycle_is_unplaced() {
        let dto: ExhibitDto = serde_json::from_value(json!({
            "id": 3,
            "name": "Qilich",
            "material": "Temir",
            "category_id": 1,
            "period": 18,
            "price": "1200",
            "status": "Qoniqarli",
            "fondType": "Asosiy"
        }))
        .unwrap();

        let exhibit = Exhibit::from(dto);

        assert_eq!(exhibit.lifecycle, LifecycleStatus::Unplaced);
        assert_eq!(exhibit.condition.as_deref(), Some("Qoniqarli"));
        assert_eq!(exhibit.fund_type.as_deref(), Some("Asosiy"));
        assert_eq!(exhibit.valuation.as_deref(), Some("1200"));
    }

    #[test]
    fn history_wire_shape() {
        let record = HistoryRecord {
            id: None,
            exhibit: 3,
            exhibit_name: "Qilich".to_string(),
            reason: "Remont ishlari".to_string(),
            note: None,
            recorded_at: "2025-03-01T09:30:00Z".parse().unwrap(),
            responsible: "A. Karimov".to_string(),
            from: None,
            to: PlacementSnapshot {
                building: 2,
                building_name: "Fond ombori".to_string(),
                floor: 1,
                room: 1,
                showcase: 1,
                shelf: 1,
            },
        };

        let body = serde_json::to_value(HistoryDto::from(&record)).unwrap();

        assert_eq!(body["data"]["key"], "3");
        assert_eq!(body["data"]["itemName"], "Qilich");
        assert!(body["data"]["info"]["fromLocation"].is_null());
        assert_eq!(body["data"]["info"]["toLocation"]["buildingName"], "Fond ombori");
        assert_eq!(body["data"]["info"]["responsiblePerson"], "A. Karimov");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn history_with_bad_key_is_malformed() {
        let dto: HistoryDto = serde_json::from_value(json!({
            "id": 1,
            "data": {
                "key": "abc",
                "itemName": "Qilich",
                "info": {
                    "fromLocation": null,
                    "toLocation": {
                        "buildingName": "Fond ombori",
                        "floor": 1, "room": 1, "showcase": 1, "shelf": 1
                    },
                    "reason": "Boshqa",
                    "date": "2025-03-01T09:30:00Z",
                    "responsiblePerson": "A. Karimov"
                }
            }
        }))
        .unwrap();

        assert!(matches!(
            HistoryRecord::try_from(dto),
            Err(RestError::Malformed(_))
        ));
    }
}
