//! Streaming availability module - checks albums against external catalogs.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`spotify/dto.rs`, `rdio/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to uniform [`CatalogHit`]s
//! - **Clients** - HTTP clients making one classified request at a time
//! - **Retry** - Backoff state machine wrapped around every client call
//! - **Matcher** - Decides whether any hit is the requested album
//! - **Service** - Runs the lookup on every provider
//! - **Driver** - Streams records through the service with fixed pacing
//!
//! # Usage
//!
//! ```ignore
//! use availability::{AvailabilityConfig, AvailabilityService, Driver, ReferenceSet};
//!
//! let service = AvailabilityService::new(&AvailabilityConfig {
//!     rdio_consumer_key: "key".to_string(),
//!     rdio_consumer_secret: "secret".to_string(),
//!     ..Default::default()
//! })?;
//! let reference = ReferenceSet::empty();
//! let summary = Driver::new(&service, &reference)
//!     .run("stdin", std::io::stdin().lock(), std::io::stdout().lock())
//!     .await?;
//! ```

pub mod domain;
pub mod driver;
pub mod matcher;
pub mod normalize;
pub mod rdio;
pub mod reference;
pub mod retry;
pub mod service;
pub mod spotify;
pub mod traits;

pub use domain::{AlbumRequest, CatalogHit, LookupError, Provider, StreamResult};
pub use driver::{Driver, RunSummary};
pub use normalize::normalize;
pub use reference::ReferenceSet;
pub use service::{AvailabilityConfig, AvailabilityService, Reconciled};

/// User agent sent to every provider
pub(crate) const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION")
);
