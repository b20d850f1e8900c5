//! Multi-source venue extraction and reconciliation.
//!
//! Three extraction strategies run over one acquired page (embedded
//! structured data, rendered-DOM lookups, static-markup fallback) and
//! the reconciler merges their source-tagged partial records into one
//! canonical [`venuedb_core::VenueRecord`] under a per-field policy table.

pub mod dedup;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod links;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod session;
pub mod snapshot;
pub mod types;

pub use error::ScrapeError;
pub use pipeline::{extract, extract_with_timeout, DEFAULT_FIELD_LOOKUP_TIMEOUT_MS};
pub use session::BrowserSession;
pub use types::{AcquiredPage, ExtractorSource, PartialVenueRecord};
