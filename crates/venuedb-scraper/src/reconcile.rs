//! Per-field reconciliation of source-tagged partial records.
//!
//! The merge is driven by a declarative per-field policy table rather than
//! hand-written branches, so adding a field means adding a table entry. The
//! input is an unordered set: records carry their own source identity and
//! are ordered here, so correctness never depends on extractor scheduling.

use std::collections::HashSet;

use venuedb_core::{CapacityRow, ContactInfo, Policies, Price, SpaceType};

use crate::types::PartialVenueRecord;

/// Canonical field names, for the merge policy table and provenance logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Location,
    Address,
    Price,
    Rating,
    ReviewsCount,
    Description,
    Capacity,
    Amenities,
    Policies,
    Contact,
    Images,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// First present value in source-priority order.
    Priority,
    /// Deduplicated concatenation across all sources; partial lists are
    /// complementary, not conflicting.
    Union,
    /// Rows merged by entry key, then leftovers concatenated in priority
    /// order.
    KeyedMerge,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Name,
        Field::Location,
        Field::Address,
        Field::Price,
        Field::Rating,
        Field::ReviewsCount,
        Field::Description,
        Field::Capacity,
        Field::Amenities,
        Field::Policies,
        Field::Contact,
        Field::Images,
    ];

    /// The merge policy table.
    #[must_use]
    pub const fn strategy(self) -> MergeStrategy {
        match self {
            Field::Images | Field::Amenities => MergeStrategy::Union,
            Field::Capacity => MergeStrategy::KeyedMerge,
            _ => MergeStrategy::Priority,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Location => "location",
            Field::Address => "address",
            Field::Price => "price",
            Field::Rating => "rating",
            Field::ReviewsCount => "reviews_count",
            Field::Description => "description",
            Field::Capacity => "capacity",
            Field::Amenities => "amenities",
            Field::Policies => "policies",
            Field::Contact => "contact",
            Field::Images => "images",
        }
    }
}

/// The merged field set. Identity metadata (`source_url`, `scraped_at`) is
/// stamped by the pipeline, not here; the reconciler fabricates nothing.
#[derive(Debug, Default)]
pub struct ReconciledFields {
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub price: Option<Price>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u32>,
    pub description: Option<String>,
    pub capacity: Option<Vec<CapacityRow>>,
    pub amenities: Option<Vec<String>>,
    pub policies: Option<Policies>,
    pub contact: Option<ContactInfo>,
    pub images: Option<Vec<String>>,
}

/// Merge partial records into one canonical field set.
///
/// Accepts the records in any order; they are sorted by source priority
/// (structured data, then rendered DOM, then markup fallback) before the
/// per-field policies apply. A field absent in every source stays absent,
/// never defaulted to an empty string, zero, or `Some(vec![])`.
#[must_use]
pub fn reconcile(mut parts: Vec<PartialVenueRecord>) -> ReconciledFields {
    parts.sort_by_key(|p| p.source.priority());

    ReconciledFields {
        name: select(&parts, Field::Name, |p| p.name.as_ref()),
        location: select(&parts, Field::Location, |p| p.location.as_ref()),
        address: select(&parts, Field::Address, |p| p.address.as_ref()),
        price: select(&parts, Field::Price, |p| p.price.as_ref()),
        rating: select(&parts, Field::Rating, |p| p.rating.as_ref()),
        reviews_count: select(&parts, Field::ReviewsCount, |p| p.reviews_count.as_ref()),
        description: select(&parts, Field::Description, |p| p.description.as_ref()),
        capacity: merge_capacity(&parts),
        amenities: union(&parts, Field::Amenities, |p| p.amenities.as_slice()),
        policies: select(&parts, Field::Policies, |p| p.policies.as_ref()),
        contact: select(&parts, Field::Contact, |p| p.contact.as_ref()),
        images: union(&parts, Field::Images, |p| p.images.as_slice()),
    }
}

/// Priority strategy: first present value wins. Values are already
/// normalized, so "present" implies "well-typed for the field".
fn select<T: Clone>(
    parts: &[PartialVenueRecord],
    field: Field,
    get: impl Fn(&PartialVenueRecord) -> Option<&T>,
) -> Option<T> {
    debug_assert!(matches!(field.strategy(), MergeStrategy::Priority));
    for part in parts {
        if let Some(value) = get(part) {
            tracing::debug!(
                field = field.as_str(),
                source = part.source.as_str(),
                "field resolved by priority"
            );
            return Some(value.clone());
        }
    }
    None
}

/// Union strategy: deduplicated concatenation, first-seen order preserved.
fn union(
    parts: &[PartialVenueRecord],
    field: Field,
    get: impl Fn(&PartialVenueRecord) -> &[String],
) -> Option<Vec<String>> {
    debug_assert!(matches!(field.strategy(), MergeStrategy::Union));
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for part in parts {
        for item in get(part) {
            let key = item.trim().to_string();
            if key.is_empty() {
                continue;
            }
            if seen.insert(key.clone()) {
                merged.push(key);
            }
        }
    }
    if merged.is_empty() {
        None
    } else {
        tracing::debug!(field = field.as_str(), count = merged.len(), "field unioned");
        Some(merged)
    }
}

/// Keyed-merge strategy for capacity: rows naming the same area are merged,
/// with higher-priority values kept and gaps filled from lower-priority
/// sources; rows unique to one source concatenate in priority order.
fn merge_capacity(parts: &[PartialVenueRecord]) -> Option<Vec<CapacityRow>> {
    debug_assert!(matches!(Field::Capacity.strategy(), MergeStrategy::KeyedMerge));
    let mut merged: Vec<CapacityRow> = Vec::new();

    for part in parts {
        for row in &part.capacity {
            let key = row.area.trim().to_lowercase();
            if let Some(existing) = merged
                .iter_mut()
                .find(|r| r.area.trim().to_lowercase() == key)
            {
                if existing.seating.is_none() {
                    existing.seating = row.seating;
                }
                if existing.floating.is_none() {
                    existing.floating = row.floating;
                }
                if existing.dimensions.is_none() {
                    existing.dimensions = row.dimensions.clone();
                }
                if existing.space_type == SpaceType::Unspecified {
                    existing.space_type = row.space_type;
                }
            } else {
                merged.push(row.clone());
            }
        }
    }

    (!merged.is_empty()).then_some(merged)
}
