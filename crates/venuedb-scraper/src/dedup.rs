//! Stable record keys and first-seen deduplication.

use sha2::{Digest, Sha256};
use url::Url;

use venuedb_core::VenueRecord;

/// Compute a stable dedup key for a venue record.
///
/// SHA-256 over `name || location || source host`, with name and location
/// lower-cased and trimmed. Records with no scraped name fall back to their
/// full source URL so distinct pages never collide. Hex-encoded.
#[must_use]
pub fn make_venue_key(record: &VenueRecord) -> String {
    let host = Url::parse(&record.source_url)
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
        .unwrap_or_else(|| record.source_url.clone());
    let name = record.name.as_deref().unwrap_or(record.source_url.as_str());
    let location = record.location.as_deref().unwrap_or("");

    let input = format!(
        "{}\x00{}\x00{}",
        name.trim().to_lowercase(),
        location.trim().to_lowercase(),
        host.to_lowercase(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Keep the first record per key, preserving input order.
#[must_use]
pub fn dedup_records(records: Vec<VenueRecord>) -> Vec<VenueRecord> {
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(make_venue_key(record)))
        .collect()
}

/// Clean a list of URL lines: trim whitespace, stray quotes, and trailing
/// commas; drop empties; dedup preserving first-seen order.
#[must_use]
pub fn dedup_lines(lines: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut cleaned = Vec::new();
    for line in lines {
        let link = line.trim().trim_matches(|c| c == '"' || c == ',').trim();
        if link.is_empty() {
            continue;
        }
        if seen.insert(link.to_string()) {
            cleaned.push(link.to_string());
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(name: Option<&str>, location: Option<&str>, source_url: &str) -> VenueRecord {
        VenueRecord {
            name: name.map(ToString::to_string),
            location: location.map(ToString::to_string),
            address: None,
            price: None,
            rating: None,
            reviews_count: None,
            description: None,
            capacity: None,
            amenities: None,
            policies: None,
            contact: None,
            images: None,
            source_url: source_url.to_string(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn key_is_deterministic_and_hex_encoded() {
        let r = record(Some("Fiestaa Resort"), Some("Bangalore"), "https://example.com/v/1");
        let key1 = make_venue_key(&r);
        let key2 = make_venue_key(&r);
        assert_eq!(key1, key2);
        assert_eq!(key1.len(), 64, "SHA-256 hex is 64 chars");
    }

    #[test]
    fn key_normalises_case_and_whitespace() {
        let a = record(Some("  fiestaa resort "), Some("bangalore"), "https://example.com/v/1");
        let b = record(Some("Fiestaa Resort"), Some("Bangalore"), "https://example.com/v/2");
        assert_eq!(
            make_venue_key(&a),
            make_venue_key(&b),
            "same name+location+host must collide regardless of case"
        );
    }

    #[test]
    fn key_differs_for_distinct_venues() {
        let a = record(Some("Fiestaa Resort"), Some("Bangalore"), "https://example.com/v/1");
        let b = record(Some("Tamarind Tree"), Some("Bangalore"), "https://example.com/v/2");
        assert_ne!(make_venue_key(&a), make_venue_key(&b));
    }

    #[test]
    fn nameless_records_key_on_their_source_url() {
        let a = record(None, None, "https://example.com/v/1");
        let b = record(None, None, "https://example.com/v/2");
        assert_ne!(
            make_venue_key(&a),
            make_venue_key(&b),
            "distinct pages without names must not collide"
        );
    }

    #[test]
    fn dedup_keeps_the_first_occurrence() {
        let records = vec![
            record(Some("A"), Some("Bangalore"), "https://example.com/v/1"),
            record(Some("B"), Some("Mysore"), "https://example.com/v/2"),
            record(Some("a"), Some("BANGALORE"), "https://example.com/v/3"),
        ];
        let deduped = dedup_records(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].source_url, "https://example.com/v/1");
        assert_eq!(deduped[1].source_url, "https://example.com/v/2");
    }

    #[test]
    fn url_lines_are_cleaned_and_deduped() {
        let lines = vec![
            "  \"https://example.com/v/1\",".to_string(),
            "https://example.com/v/1".to_string(),
            String::new(),
            "https://example.com/v/2".to_string(),
        ];
        assert_eq!(
            dedup_lines(&lines),
            vec!["https://example.com/v/1", "https://example.com/v/2"]
        );
    }
}
