use thiserror::Error;
use vitrina_core::{BuildingId, Coordinate, ExhibitId};

/// Why a destination was rejected before any write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("building {0} does not exist")]
    UnknownBuilding(BuildingId),

    #[error("{coordinate} {value} is outside 1..={bound} for building {building}")]
    OutOfBounds {
        building: BuildingId,
        coordinate: Coordinate,
        value: u32,
        bound: u32,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError<E: std::error::Error + 'static> {
    #[error("exhibit {exhibit} has {count} location records")]
    MultiplePlacementsFound { exhibit: ExhibitId, count: usize },

    #[error("location lookup failed: {0}")]
    Gateway(#[source] E),
}

/// Fatal outcomes of a relocation. None of these leave a partial write behind.
#[derive(Debug, Error)]
pub enum RelocationError<E: std::error::Error + 'static> {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("exhibit {0} not found")]
    ExhibitNotFound(ExhibitId),

    #[error("exhibit lookup failed: {0}")]
    ExhibitLookupFailed(#[source] E),

    #[error("building lookup failed: {0}")]
    BuildingLookupFailed(#[source] E),

    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] PlacementError),

    #[error("exhibit {exhibit} has {count} location records")]
    MultiplePlacementsFound { exhibit: ExhibitId, count: usize },

    #[error("location lookup failed: {0}")]
    LocationLookupFailed(#[source] E),

    #[error("location write failed: {0}")]
    LocationWriteFailed(#[source] E),
}

impl<E: std::error::Error + 'static> RelocationError<E> {
    /// Errors the operator can fix by correcting the input and trying again.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RelocationError::MissingField(_)
                | RelocationError::ExhibitNotFound(_)
                | RelocationError::InvalidPlacement(_)
        )
    }

    /// Inconsistencies in the backing store rather than transient failures.
    pub fn is_consistency_fault(&self) -> bool {
        matches!(self, RelocationError::MultiplePlacementsFound { .. })
    }
}

impl<E: std::error::Error + 'static> From<ResolveError<E>> for RelocationError<E> {
    fn from(err: ResolveError<E>) -> Self {
        match err {
            ResolveError::MultiplePlacementsFound { exhibit, count } => {
                RelocationError::MultiplePlacementsFound { exhibit, count }
            }
            ResolveError::Gateway(e) => RelocationError::LocationLookupFailed(e),
        }
    }
}
