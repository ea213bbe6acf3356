use std::fmt;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use vitrina_core::{
    ExhibitId, Gateway, HistoryRecord, LifecycleStatus, Location, LocationDraft, LocationId,
    MuseumBackend, Placement,
};

use crate::error::{PlacementError, RelocationError};
use crate::projector::{self, BuildingIndex, Transfer};
use crate::resolver::LocationResolver;

type GatewayError<G> = <G as Gateway>::Error;

/// Operator input for one relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationRequest {
    pub exhibit: ExhibitId,
    pub destination: Placement,
    pub reason: String,
    pub responsible: String,
    pub note: Option<String>,
}

/// Bookkeeping that failed after the location was written.
///
/// The move itself stands; these only describe what is missing around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelocationWarning {
    StatusUpdateFailed {
        status: LifecycleStatus,
        message: String,
    },
    HistoryWriteFailed {
        message: String,
    },
    /// The location changed between the initial read and the write.
    ConcurrentRelocation {
        expected: Option<LocationId>,
        found: Option<LocationId>,
    },
}

impl fmt::Display for RelocationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelocationWarning::StatusUpdateFailed { status, message } => {
                write!(f, "exhibit status was not set to {}: {}", status, message)
            }
            RelocationWarning::HistoryWriteFailed { message } => {
                write!(f, "audit trail is incomplete: {}", message)
            }
            RelocationWarning::ConcurrentRelocation { expected, found } => write!(
                f,
                "location changed during relocation (expected {}, found {})",
                describe(*expected),
                describe(*found)
            ),
        }
    }
}

fn describe(id: Option<LocationId>) -> String {
    match id {
        Some(id) => format!("location {}", id),
        None => "no location".to_string(),
    }
}

/// A relocation whose location write succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// The location record as written.
    pub location: Location,
    /// The record as it was before the move; `None` for a first placement.
    pub previous: Option<Location>,
    /// Set when the lifecycle status update went through.
    pub status: Option<LifecycleStatus>,
    /// The persisted audit entry.
    pub history_record: Option<HistoryRecord>,
    /// The audit entry that could not be written, ready for [`Relocator::record_history`].
    pub unrecorded_history: Option<HistoryRecord>,
    pub warnings: Vec<RelocationWarning>,
}

impl Relocation {
    pub fn is_first_placement(&self) -> bool {
        self.previous.is_none()
    }

    /// True when the status flag and the audit entry were both written.
    pub fn is_complete(&self) -> bool {
        self.status.is_some() && self.history_record.is_some()
    }
}

/// Serializable summary handed to a presentation surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationReport {
    pub success: bool,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_record: Option<HistoryRecord>,
    /// Set when the history write failed; resubmit with [`Relocator::record_history`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrecorded_history: Option<HistoryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelocationReport {
    pub fn from_result<E: std::error::Error + 'static>(
        result: &Result<Relocation, RelocationError<E>>,
    ) -> Self {
        match result {
            Ok(relocation) => Self {
                success: true,
                warnings: relocation.warnings.iter().map(ToString::to_string).collect(),
                history_record: relocation.history_record.clone(),
                unrecorded_history: relocation.unrecorded_history.clone(),
                error: None,
            },
            Err(err) => Self {
                success: false,
                warnings: Vec::new(),
                history_record: None,
                unrecorded_history: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Moves exhibits between storage slots and records the audit trail.
///
/// Writes happen in a fixed order: location, then exhibit status, then
/// history. Only the location write is fatal. A written location is never
/// rolled back because later bookkeeping failed.
pub struct Relocator<'a, G> {
    gateway: &'a G,
}

impl<'a, G: MuseumBackend> Relocator<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub fn resolver(&self) -> LocationResolver<'a, G> {
        LocationResolver::new(self.gateway)
    }

    #[instrument(skip_all, fields(exhibit = request.exhibit, destination = %request.destination))]
    pub async fn relocate(
        &self,
        request: &RelocationRequest,
    ) -> Result<Relocation, RelocationError<GatewayError<G>>> {
        let Some(reason) = required(&request.reason) else {
            return Err(RelocationError::MissingField("reason"));
        };
        let Some(responsible) = required(&request.responsible) else {
            return Err(RelocationError::MissingField("responsible party"));
        };
        let note = request
            .note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty());

        let Some(exhibit) = self
            .gateway
            .get_exhibit(request.exhibit)
            .await
            .map_err(RelocationError::ExhibitLookupFailed)?
        else {
            return Err(RelocationError::ExhibitNotFound(request.exhibit));
        };

        let buildings = BuildingIndex::new(
            self.gateway
                .list_buildings()
                .await
                .map_err(RelocationError::BuildingLookupFailed)?,
        );
        validate_destination(&buildings, &request.destination)?;

        let resolver = self.resolver();
        let previous = resolver.resolve_current_location(exhibit.id).await?;
        let mut warnings = Vec::new();

        // Diagnostic only: no lock exists on the location resource, so a
        // concurrent move is reported and the path chosen above still applies.
        match resolver.resolve_current_location(exhibit.id).await {
            Ok(current) if same_placement(&current, &previous) => {}
            Ok(current) => {
                warn!(
                    expected = ?previous.as_ref().map(|l| l.id),
                    found = ?current.as_ref().map(|l| l.id),
                    "location changed since it was read"
                );
                warnings.push(RelocationWarning::ConcurrentRelocation {
                    expected: previous.as_ref().map(|l| l.id),
                    found: current.as_ref().map(|l| l.id),
                });
            }
            Err(err) => warn!(error = %err, "location re-check failed"),
        }

        let draft = LocationDraft {
            exhibit: exhibit.id,
            placement: request.destination,
            responsible: Some(responsible.to_string()),
            note: note.map(str::to_string),
            reason: Some(reason.to_string()),
        };
        let location = match &previous {
            None => self.gateway.create_location(&draft).await,
            Some(current) => self.gateway.update_location(current.id, &draft).await,
        }
        .map_err(RelocationError::LocationWriteFailed)?;
        info!(location = location.id, "location written");

        let target = if previous.is_some() {
            LifecycleStatus::Moved
        } else {
            LifecycleStatus::Placed
        };
        let status = match self.gateway.set_lifecycle_status(exhibit.id, target).await {
            Ok(_) => Some(target),
            Err(err) => {
                warn!(error = %err, status = %target, "status update failed");
                warnings.push(RelocationWarning::StatusUpdateFailed {
                    status: target,
                    message: err.to_string(),
                });
                None
            }
        };

        let record = projector::project(
            &Transfer {
                exhibit: &exhibit,
                from: previous.as_ref().map(|l| &l.placement),
                to: &location.placement,
                reason,
                responsible,
                note,
            },
            &buildings,
        );
        let (history_record, unrecorded_history) =
            match self.gateway.append_history(&record).await {
                Ok(stored) => {
                    debug!(history = ?stored.id, "history recorded");
                    (Some(stored), None)
                }
                Err(err) => {
                    warn!(error = %err, "history write failed");
                    warnings.push(RelocationWarning::HistoryWriteFailed {
                        message: err.to_string(),
                    });
                    (None, Some(record))
                }
            };

        Ok(Relocation {
            location,
            previous,
            status,
            history_record,
            unrecorded_history,
            warnings,
        })
    }

    /// Resubmits only the audit entry of an earlier relocation.
    #[instrument(skip_all, fields(exhibit = record.exhibit))]
    pub async fn record_history(
        &self,
        record: &HistoryRecord,
    ) -> Result<HistoryRecord, GatewayError<G>> {
        self.gateway.append_history(record).await
    }

    /// Placement lineage of one exhibit, oldest first.
    pub async fn history_for_exhibit(
        &self,
        exhibit: ExhibitId,
    ) -> Result<Vec<HistoryRecord>, GatewayError<G>> {
        let mut records: Vec<HistoryRecord> = self
            .gateway
            .list_history()
            .await?
            .into_iter()
            .filter(|record| record.exhibit == exhibit)
            .collect();
        records.sort_by_key(|record| record.recorded_at);
        Ok(records)
    }
}

fn required(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|value| !value.is_empty())
}

fn validate_destination(
    buildings: &BuildingIndex,
    destination: &Placement,
) -> Result<(), PlacementError> {
    let building = buildings
        .get(destination.building)
        .ok_or(PlacementError::UnknownBuilding(destination.building))?;

    match building.first_violation(destination) {
        Some((coordinate, value, bound)) => Err(PlacementError::OutOfBounds {
            building: building.id,
            coordinate,
            value,
            bound,
        }),
        None => Ok(()),
    }
}

fn same_placement(a: &Option<Location>, b: &Option<Location>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.id == b.id && a.placement == b.placement,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrina_core::{Building, Coordinate, MemoryError};

    fn index() -> BuildingIndex {
        BuildingIndex::new([Building {
            id: 1,
            name: "Asosiy bino".to_string(),
            floors: 2,
            rooms: 6,
            showcases: 3,
            shelves: 4,
        }])
    }

    #[test]
    fn destination_inside_bounds() {
        assert_eq!(validate_destination(&index(), &Placement::new(1, 2, 6, 3, 4)), Ok(()));
    }

    #[test]
    fn destination_in_unknown_building() {
        assert_eq!(
            validate_destination(&index(), &Placement::new(4, 1, 1, 1, 1)),
            Err(PlacementError::UnknownBuilding(4))
        );
    }

    #[test]
    fn destination_shelf_out_of_bounds() {
        assert_eq!(
            validate_destination(&index(), &Placement::new(1, 1, 1, 1, 5)),
            Err(PlacementError::OutOfBounds {
                building: 1,
                coordinate: Coordinate::Shelf,
                value: 5,
                bound: 4,
            })
        );
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert_eq!(required("   "), None);
        assert_eq!(required(" Remont ishlari "), Some("Remont ishlari"));
    }

    #[test]
    fn warning_messages() {
        let warning = RelocationWarning::ConcurrentRelocation {
            expected: None,
            found: Some(3),
        };
        assert_eq!(
            warning.to_string(),
            "location changed during relocation (expected no location, found location 3)"
        );
    }

    #[test]
    fn report_for_failure() {
        let result: Result<Relocation, RelocationError<MemoryError>> =
            Err(RelocationError::ExhibitNotFound(9));

        let report = RelocationReport::from_result(&result);

        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("exhibit 9 not found"));
        assert!(report.history_record.is_none());
        assert!(report.unrecorded_history.is_none());
    }
}
