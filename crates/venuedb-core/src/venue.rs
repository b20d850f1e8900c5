//! Domain types for venue extraction.
//!
//! These are the canonical output shapes shared by the scraper pipeline and
//! the CLI. Absent fields stay `None` and serialize as `null`; downstream
//! consumers treat partial records as the normal case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A venue's starting-price entry as displayed on the profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Original display string, e.g. `"₹1,50,000"`. Preserved verbatim.
    pub starting: String,
    /// Qualifier shown alongside the amount, e.g. `"per plate"`.
    pub subtitle: Option<String>,
    /// Amount in whole currency units (not the smallest denomination).
    pub numeric_value: u64,
    /// ISO 4217 code. `"INR"` when the symbol is missing or unrecognised.
    pub currency: String,
}

/// Whether a bookable area is covered or open-air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceType {
    Indoor,
    Outdoor,
    Unspecified,
}

impl std::fmt::Display for SpaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceType::Indoor => write!(f, "indoor"),
            SpaceType::Outdoor => write!(f, "outdoor"),
            SpaceType::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// One bookable area within a venue, with its guest counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRow {
    /// Area display name, e.g. `"Grand Ballroom"`.
    pub area: String,
    #[serde(rename = "type")]
    pub space_type: SpaceType,
    /// Seated guest count.
    pub seating: Option<u32>,
    /// Standing ("floating") guest count.
    pub floating: Option<u32>,
    /// Raw dimension string, e.g. `"120 x 80 ft"`. Not parsed further.
    pub dimensions: Option<String>,
}

/// Venue policy answers lifted from the profile's FAQ section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policies {
    pub catering: Option<String>,
    pub decor: Option<String>,
    pub alcohol: Option<String>,
    pub music: Option<String>,
    pub timing: Option<String>,
    pub parking: Option<String>,
}

impl Policies {
    /// A policies block counts as present only when at least one answer is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catering.is_none()
            && self.decor.is_none()
            && self.alcohol.is_none()
            && self.music.is_none()
            && self.timing.is_none()
            && self.parking.is_none()
    }
}

/// Contact details for the venue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl ContactInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none() && self.website.is_none()
    }
}

/// The canonical, reconciled venue record for one scraped page.
///
/// `source_url` and `scraped_at` are stamped once by the pipeline and never
/// mutated afterwards. Every other field may be absent; list fields are
/// `None` (never `Some(vec![])`) when no source contributed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueRecord {
    pub name: Option<String>,
    /// Coarse locality, e.g. `"Whitefield, Bangalore"`.
    pub location: Option<String>,
    /// Full street address as displayed.
    pub address: Option<String>,
    pub price: Option<Price>,
    /// Aggregate rating in `[0, 5]`.
    pub rating: Option<f64>,
    pub reviews_count: Option<u32>,
    pub description: Option<String>,
    pub capacity: Option<Vec<CapacityRow>>,
    pub amenities: Option<Vec<String>>,
    pub policies: Option<Policies>,
    pub contact: Option<ContactInfo>,
    pub images: Option<Vec<String>>,
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,
}
