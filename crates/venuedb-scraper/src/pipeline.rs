//! Pipeline orchestration: one acquired page in, one canonical record out.
//!
//! Runs the three extractors over independent views of the page, reconciles
//! their partial records, and stamps identity metadata. Individual extractor
//! shortfalls are never pipeline failures; only a structurally invalid page
//! crosses the boundary as an error.

use std::time::Duration;

use chrono::Utc;

use venuedb_core::VenueRecord;

use crate::error::ScrapeError;
use crate::extract::{extract_markup, extract_rendered, extract_structured};
use crate::reconcile::reconcile;
use crate::types::{AcquiredPage, ExtractorSource, PartialVenueRecord};

/// Default upper bound for a single rendered-DOM field lookup.
pub const DEFAULT_FIELD_LOOKUP_TIMEOUT_MS: u64 = 2_000;

/// Extract a canonical venue record from an acquired page.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidPage`] when the page has neither static
/// content nor a live session; that is the only pipeline-level failure. A
/// record with absent fields is a normal, successful result.
pub async fn extract(
    page: &AcquiredPage<'_>,
    source_url: &str,
) -> Result<VenueRecord, ScrapeError> {
    extract_with_timeout(
        page,
        source_url,
        Duration::from_millis(DEFAULT_FIELD_LOOKUP_TIMEOUT_MS),
    )
    .await
}

/// [`extract`] with a caller-supplied bound for each rendered-DOM field
/// lookup.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidPage`] when the page has neither static
/// content nor a live session.
pub async fn extract_with_timeout(
    page: &AcquiredPage<'_>,
    source_url: &str,
    field_timeout: Duration,
) -> Result<VenueRecord, ScrapeError> {
    if !page.is_valid() {
        return Err(ScrapeError::InvalidPage {
            url: source_url.to_owned(),
        });
    }

    let structured = extract_structured(&page.static_content);
    let markup = extract_markup(&page.static_content);
    // The live handle is a serialized resource; only this extractor queries it.
    let rendered = match page.live {
        Some(client) => extract_rendered(client, field_timeout).await,
        None => PartialVenueRecord::empty(ExtractorSource::RenderedDom),
    };

    tracing::debug!(
        source_url,
        structured_empty = structured.is_empty(),
        rendered_empty = rendered.is_empty(),
        markup_empty = markup.is_empty(),
        "extractors complete"
    );

    let fields = reconcile(vec![markup, structured, rendered]);

    Ok(VenueRecord {
        name: fields.name,
        location: fields.location,
        address: fields.address,
        price: fields.price,
        rating: fields.rating,
        reviews_count: fields.reviews_count,
        description: fields.description,
        capacity: fields.capacity,
        amenities: fields.amenities,
        policies: fields.policies,
        contact: fields.contact,
        images: fields.images,
        source_url: source_url.to_owned(),
        scraped_at: Utc::now(),
    })
}
