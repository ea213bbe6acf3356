//! Relocation and audit-trail workflow for museum exhibits.
//!
//! A relocation touches three independent remote resources with no shared
//! transaction: the exhibit's location, its lifecycle status, and the history
//! log. [`Relocator::relocate`] writes them in that order. The location write
//! is the only fatal step; status and history failures come back as
//! [`RelocationWarning`]s alongside a successful [`Relocation`].
//!
//! # Example
//!
//! ```
//! use vitrina_core::{Building, Exhibit, MemoryGateway, Placement};
//! use vitrina_relocation::{RelocationRequest, Relocator};
//!
//! # tokio_test_block(async {
//! let gateway = MemoryGateway::new();
//! gateway.insert_exhibit(Exhibit::new(1, "Kumush ko'za", 1));
//! gateway.insert_building(Building {
//!     id: 1,
//!     name: "Asosiy bino".to_string(),
//!     floors: 3,
//!     rooms: 10,
//!     showcases: 5,
//!     shelves: 5,
//! });
//!
//! let relocation = Relocator::new(&gateway)
//!     .relocate(&RelocationRequest {
//!         exhibit: 1,
//!         destination: Placement::new(1, 2, 5, 1, 3),
//!         reason: "Yangi eksponat qo'shildi".to_string(),
//!         responsible: "A. Karimov".to_string(),
//!         note: None,
//!     })
//!     .await
//!     .unwrap();
//!
//! assert!(relocation.is_first_placement());
//! assert!(relocation.is_complete());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod orchestrator;
pub mod projector;
mod resolver;

pub use error::{PlacementError, RelocationError, ResolveError};
pub use orchestrator::{
    Relocation, RelocationReport, RelocationRequest, RelocationWarning, Relocator,
};
pub use projector::{BuildingIndex, Transfer};
pub use resolver::LocationResolver;
