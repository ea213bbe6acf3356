use tracing::{debug, instrument};
use vitrina_core::{ExhibitId, Gateway, Location, LocationStore};

use crate::error::ResolveError;

/// Finds the current placement of an exhibit.
///
/// Reads are never cached; every call lists the collection afresh because the
/// location may change underneath between calls.
pub struct LocationResolver<'a, G> {
    gateway: &'a G,
}

impl<'a, G: LocationStore> LocationResolver<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Returns `None` if the exhibit has never been placed.
    ///
    /// More than one record for the same exhibit is a store consistency
    /// fault and is reported instead of picking one.
    #[instrument(skip(self))]
    pub async fn resolve_current_location(
        &self,
        exhibit: ExhibitId,
    ) -> Result<Option<Location>, ResolveError<<G as Gateway>::Error>> {
        let locations = self
            .gateway
            .list_locations()
            .await
            .map_err(ResolveError::Gateway)?;

        let mut matches: Vec<Location> = locations
            .into_iter()
            .filter(|location| location.exhibit == exhibit)
            .collect();

        match matches.len() {
            0 => {
                debug!("exhibit has no location");
                Ok(None)
            }
            1 => Ok(matches.pop()),
            count => Err(ResolveError::MultiplePlacementsFound { exhibit, count }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrina_core::{LocationDraft, MemoryError, MemoryGateway, Operation, Placement};

    fn location(id: u64, exhibit: ExhibitId) -> Location {
        LocationDraft {
            exhibit,
            placement: Placement::new(1, 1, 2, 3, 4),
            responsible: Some("A. Karimov".to_string()),
            note: None,
            reason: None,
        }
        .into_location(id)
    }

    #[tokio::test]
    async fn unplaced_exhibit_resolves_to_none() {
        let gateway = MemoryGateway::new();
        gateway.insert_location(location(1, 2));

        let resolved = LocationResolver::new(&gateway)
            .resolve_current_location(1)
            .await
            .unwrap();

        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn resolves_single_match() {
        let gateway = MemoryGateway::new();
        gateway.insert_location(location(1, 2));
        gateway.insert_location(location(2, 7));

        let resolved = LocationResolver::new(&gateway)
            .resolve_current_location(7)
            .await
            .unwrap();

        assert_eq!(resolved, Some(location(2, 7)));
    }

    #[tokio::test]
    async fn duplicate_records_are_a_fault() {
        let gateway = MemoryGateway::new();
        gateway.insert_location(location(1, 7));
        gateway.insert_location(location(2, 7));

        let result = LocationResolver::new(&gateway).resolve_current_location(7).await;

        match result {
            Err(ResolveError::MultiplePlacementsFound { exhibit, count }) => {
                assert_eq!(exhibit, 7);
                assert_eq!(count, 2);
            }
            other => panic!("Expected MultiplePlacementsFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn gateway_failure_is_surfaced() {
        let gateway = MemoryGateway::new();
        gateway.fail(Operation::ListLocations);

        let result = LocationResolver::new(&gateway).resolve_current_location(1).await;

        assert!(matches!(
            result,
            Err(ResolveError::Gateway(MemoryError::Injected(Operation::ListLocations)))
        ));
    }
}
