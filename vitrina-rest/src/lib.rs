//! REST gateway for the museum inventory backend.
//!
//! [`MuseumClient`] implements every `vitrina-core` gateway trait over HTTP,
//! so it can be handed straight to the relocation workflow.
//!
//! # Example
//!
//! ```ignore
//! use vitrina_core::Placement;
//! use vitrina_relocation::{RelocationRequest, Relocator};
//! use vitrina_rest::MuseumClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = MuseumClient::new("http://localhost:3000/api/v1").with_token("token");
//!
//!     let relocation = Relocator::new(&client)
//!         .relocate(&RelocationRequest {
//!             exhibit: 1,
//!             destination: Placement::new(2, 1, 1, 1, 1),
//!             reason: "Remont ishlari".to_string(),
//!             responsible: "A. Karimov".to_string(),
//!             note: None,
//!         })
//!         .await
//!         .unwrap();
//!
//!     for warning in &relocation.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//! }
//! ```

mod client;
mod error;
mod wire;

pub use client::{DEFAULT_BASE_URL, MuseumClient};
pub use error::RestError;
