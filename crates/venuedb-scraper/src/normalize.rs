//! Field normalizers: raw page values to canonical typed values.
//!
//! All functions are pure and total: malformed input never panics, it
//! yields a [`NormalizeError`] whose stable reason code the extractors log
//! and collapse into an absent field. Price and capacity semantics follow
//! Indian-marketplace display conventions (`₹`, comma grouping by lakh,
//! `lakh`/`crore` multipliers, `Seating | Floating` pairs).

use regex::Regex;
use thiserror::Error;

use venuedb_core::{CapacityRow, Price, SpaceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("unparseable_price")]
    UnparseablePrice,

    #[error("invalid_rating")]
    InvalidRating,

    #[error("unparseable_count")]
    UnparseableCount,
}

impl NormalizeError {
    /// Stable reason code for diagnostics.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            NormalizeError::UnparseablePrice => "unparseable_price",
            NormalizeError::InvalidRating => "invalid_rating",
            NormalizeError::UnparseableCount => "unparseable_count",
        }
    }
}

/// Parses a display price (`"₹1,50,000"`, `"Rs. 45000"`, `"₹15.00 Lakhs"`)
/// into whole currency units.
///
/// # Errors
///
/// Returns [`NormalizeError::UnparseablePrice`] when the string contains no
/// digits.
pub fn parse_price_value(text: &str) -> Result<u64, NormalizeError> {
    let re = Regex::new(r"\d[\d,]*\.?\d*").expect("valid regex");
    let matched = re
        .find(text)
        .ok_or(NormalizeError::UnparseablePrice)?
        .as_str()
        .replace(',', "");
    let number: f64 = matched
        .parse()
        .map_err(|_| NormalizeError::UnparseablePrice)?;

    let lower = text.to_lowercase();
    let multiplier = if lower.contains("lakh") {
        100_000.0
    } else if lower.contains("crore") {
        10_000_000.0
    } else {
        1.0
    };

    // The regex guarantees a non-negative value; any realistic price fits u64.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let value = (number * multiplier).round() as u64;
    Ok(value)
}

/// Detects a currency code from the symbols in a display price.
/// Unrecognised input defaults to `"INR"` (the marketplace locale).
#[must_use]
pub fn detect_currency(text: &str) -> &'static str {
    if text.contains('₹') {
        "INR"
    } else if text.contains('$') {
        "USD"
    } else if text.contains('€') {
        "EUR"
    } else if text.contains('£') {
        "GBP"
    } else {
        "INR"
    }
}

/// Builds a [`Price`] from a display string, preserving the original text as
/// `starting`.
///
/// # Errors
///
/// Returns [`NormalizeError::UnparseablePrice`] when no numeric value can be
/// extracted.
pub fn price_from_display(starting: &str, subtitle: Option<&str>) -> Result<Price, NormalizeError> {
    let numeric_value = parse_price_value(starting)?;
    Ok(Price {
        starting: starting.trim().to_string(),
        subtitle: subtitle
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string),
        numeric_value,
        currency: detect_currency(starting).to_string(),
    })
}

/// Parses a rating string into a value in `[0, 5]`.
///
/// In-range values pass through unclamped; out-of-range and non-numeric
/// input are invalid, never silently clamped into range.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidRating`] for non-numeric or out-of-range
/// input.
pub fn parse_rating(text: &str) -> Result<f64, NormalizeError> {
    let re = Regex::new(r"^\s*(\d+(?:\.\d+)?)").expect("valid regex");
    let caps = re.captures(text).ok_or(NormalizeError::InvalidRating)?;
    let value: f64 = caps[1].parse().map_err(|_| NormalizeError::InvalidRating)?;
    if (0.0..=5.0).contains(&value) {
        Ok(value)
    } else {
        Err(NormalizeError::InvalidRating)
    }
}

/// Parses the first integer out of a count string (`"(231 reviews)"` → 231).
///
/// # Errors
///
/// Returns [`NormalizeError::UnparseableCount`] when no digits are present
/// or the value overflows `u32`.
pub fn parse_count(text: &str) -> Result<u32, NormalizeError> {
    let re = Regex::new(r"\d[\d,]*").expect("valid regex");
    let matched = re
        .find(text)
        .ok_or(NormalizeError::UnparseableCount)?
        .as_str()
        .replace(',', "");
    matched.parse().map_err(|_| NormalizeError::UnparseableCount)
}

/// Classifies a space description as indoor or outdoor. Mixed or unknown
/// descriptions stay unspecified.
#[must_use]
pub fn parse_space_type(text: &str) -> SpaceType {
    let lower = text.to_lowercase();
    match (lower.contains("indoor"), lower.contains("outdoor")) {
        (true, false) => SpaceType::Indoor,
        (false, true) => SpaceType::Outdoor,
        _ => SpaceType::Unspecified,
    }
}

/// Splits a free-text capacity block into rows, one per blank-line-separated
/// group. Groups yielding no seating or floating number are dropped, not
/// emitted as empty rows.
#[must_use]
pub fn parse_capacity_text(block: &str) -> Vec<CapacityRow> {
    block
        .split("\n\n")
        .filter_map(capacity_row_from_text)
        .collect()
}

/// Parses one area group (a few lines of text: counts, area name, space
/// type, optional dimensions) into a [`CapacityRow`]. Returns `None` when
/// the group carries no numeric data.
#[must_use]
pub fn capacity_row_from_text(group: &str) -> Option<CapacityRow> {
    let dims_re = Regex::new(r"(?i)\d+\s*[x×]\s*\d+|\d+\s*sq\.?\s*ft").expect("valid regex");

    let mut seating = None;
    let mut floating = None;
    let mut area: Option<String> = None;
    let mut space_type = SpaceType::Unspecified;
    let mut dimensions: Option<String> = None;

    for line in group.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();
        let is_counts_line = line.contains('|')
            || ((lower.contains("seating") || lower.contains("floating"))
                && lower.chars().any(|c| c.is_ascii_digit()));

        if is_counts_line {
            let (s, f) = parse_capacity_pair(line);
            seating = seating.or(s);
            floating = floating.or(f);
        } else if dims_re.is_match(line) {
            dimensions = dimensions.or_else(|| Some(line.to_string()));
        } else if parse_space_type(line) != SpaceType::Unspecified && line.len() < 40 {
            space_type = parse_space_type(line);
        } else if area.is_none() {
            area = Some(line.to_string());
        }
    }

    if seating.is_none() && floating.is_none() {
        return None;
    }

    Some(CapacityRow {
        area: area.unwrap_or_else(|| "unnamed".to_string()),
        space_type,
        seating,
        floating,
        dimensions,
    })
}

/// Coarse locality from a full display address: the trailing comma segment
/// (`"Hennur Road, Kothanur, Bangalore"` to `"Bangalore"`). Single-segment
/// addresses yield nothing; the address field already carries them.
#[must_use]
pub fn location_from_address(address: &str) -> Option<String> {
    let segments: Vec<&str> = address.split(',').map(str::trim).collect();
    if segments.len() < 2 {
        return None;
    }
    let last = segments[segments.len() - 1];
    (!last.is_empty()).then(|| last.to_string())
}

/// Splits a `"100 Seating | 150 Floating"` line into its two counts.
/// Labels win over position; unlabeled parts fall back to seating-first.
fn parse_capacity_pair(line: &str) -> (Option<u32>, Option<u32>) {
    let mut seating = None;
    let mut floating = None;

    for (idx, part) in line.split('|').enumerate() {
        let lower = part.to_lowercase();
        let value = parse_count(part).ok();
        if lower.contains("float") {
            floating = floating.or(value);
        } else if lower.contains("seat") {
            seating = seating.or(value);
        } else if idx == 0 {
            seating = seating.or(value);
        } else {
            floating = floating.or(value);
        }
    }

    (seating, floating)
}
