//! Source-tagged partial records and the acquired-page input type.

use venuedb_core::{CapacityRow, ContactInfo, Policies, Price};

/// Which extraction strategy produced a partial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorSource {
    /// Embedded machine-readable data (JSON-LD, state blobs).
    StructuredData,
    /// Field lookups against the live rendered document.
    RenderedDom,
    /// Selector rules over the static HTML snapshot.
    Markup,
}

impl ExtractorSource {
    /// Merge precedence; lower wins.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            ExtractorSource::StructuredData => 0,
            ExtractorSource::RenderedDom => 1,
            ExtractorSource::Markup => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ExtractorSource::StructuredData => "structured_data",
            ExtractorSource::RenderedDom => "rendered_dom",
            ExtractorSource::Markup => "markup",
        }
    }
}

/// The fields one extractor recovered from one page.
///
/// Values are already normalized: a field that was present in the page but
/// failed normalization is recorded as absent here, so "present" always
/// implies "well-typed" by the time records reach the reconciler.
#[derive(Debug, Clone)]
pub struct PartialVenueRecord {
    pub source: ExtractorSource,
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub price: Option<Price>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u32>,
    pub description: Option<String>,
    pub capacity: Vec<CapacityRow>,
    pub amenities: Vec<String>,
    pub policies: Option<Policies>,
    pub contact: Option<ContactInfo>,
    pub images: Vec<String>,
}

impl PartialVenueRecord {
    /// An all-absent record, the zero-confidence result of an extractor that
    /// found no evidence. Not an error.
    #[must_use]
    pub fn empty(source: ExtractorSource) -> Self {
        Self {
            source,
            name: None,
            location: None,
            address: None,
            price: None,
            rating: None,
            reviews_count: None,
            description: None,
            capacity: Vec::new(),
            amenities: Vec::new(),
            policies: None,
            contact: None,
            images: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.address.is_none()
            && self.price.is_none()
            && self.rating.is_none()
            && self.reviews_count.is_none()
            && self.description.is_none()
            && self.capacity.is_empty()
            && self.amenities.is_empty()
            && self.policies.is_none()
            && self.contact.is_none()
            && self.images.is_empty()
    }
}

/// A loaded page handed to the pipeline by the fetch/session collaborators.
pub struct AcquiredPage<'a> {
    /// HTML snapshot (post-render when captured through a browser session).
    pub static_content: String,
    /// Live WebDriver handle, present when the page came from a browser
    /// session. The handle is a serialized resource; only the rendered-DOM
    /// extractor queries it.
    pub live: Option<&'a fantoccini::Client>,
}

impl AcquiredPage<'_> {
    /// Wrap statically-fetched HTML with no live session attached.
    #[must_use]
    pub fn from_static(html: String) -> AcquiredPage<'static> {
        AcquiredPage {
            static_content: html,
            live: None,
        }
    }

    /// A page is workable if it carries content or a live handle.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.static_content.trim().is_empty() || self.live.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_priority_orders_structured_first() {
        assert!(ExtractorSource::StructuredData.priority() < ExtractorSource::RenderedDom.priority());
        assert!(ExtractorSource::RenderedDom.priority() < ExtractorSource::Markup.priority());
    }

    #[test]
    fn empty_partial_record_is_empty() {
        assert!(PartialVenueRecord::empty(ExtractorSource::Markup).is_empty());
    }

    #[test]
    fn whitespace_only_page_without_live_handle_is_invalid() {
        let page = AcquiredPage::from_static("  \n\t ".to_string());
        assert!(!page.is_valid());

        let page = AcquiredPage::from_static("<html></html>".to_string());
        assert!(page.is_valid());
    }
}
