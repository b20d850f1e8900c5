//! Structured-data extraction: JSON-LD blocks and embedded state blobs.
//!
//! Highest-priority evidence source. Reads only the supplied document text;
//! a page with no parseable structured data yields an all-absent record
//! tagged with this source: lack of evidence, not an error.

use regex::Regex;

use venuedb_core::ContactInfo;

use crate::normalize::{parse_count, parse_rating, price_from_display};
use crate::types::{ExtractorSource, PartialVenueRecord};

/// Script markers that precede an embedded client-state object.
const STATE_MARKERS: [&str; 3] = ["window.__INITIAL_STATE__", "window.__NUXT__", "__NEXT_DATA__"];

/// Extract venue fields from the document's embedded structured data.
///
/// JSON-LD blocks are scanned first; when none of them yields any field,
/// embedded state blobs (`window.__INITIAL_STATE__` and friends) are tried
/// as a second structured source.
#[must_use]
pub fn extract_structured(html: &str) -> PartialVenueRecord {
    let mut record = PartialVenueRecord::empty(ExtractorSource::StructuredData);

    for value in jsonld_values(html) {
        for item in candidate_objects(value) {
            if is_venue_item(&item) {
                apply_jsonld_item(&mut record, &item);
            }
        }
    }

    if record.is_empty() {
        for state in state_blobs(html) {
            if let Some(node) = find_venue_node(&state) {
                tracing::debug!("extracting venue fields from embedded state blob");
                apply_state_node(&mut record, node);
                break;
            }
        }
    }

    record
}

/// Parse every `<script type="application/ld+json">` block into a JSON value.
fn jsonld_values(html: &str) -> Vec<serde_json::Value> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");

    script_re
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .filter_map(|m| serde_json::from_str(m.as_str()).ok())
        .collect()
}

/// Flatten a JSON-LD value into candidate objects: top-level object, array
/// elements, and the contents of `@graph` containers.
fn candidate_objects(value: serde_json::Value) -> Vec<serde_json::Value> {
    let mut candidates: Vec<serde_json::Value> = if let serde_json::Value::Array(items) = value {
        items
    } else {
        vec![value]
    };

    let mut expanded = Vec::new();
    for item in &candidates {
        if let Some(graph) = item.get("@graph").and_then(serde_json::Value::as_array) {
            expanded.extend(graph.iter().cloned());
        }
    }
    candidates.extend(expanded);
    candidates
}

/// Accept JSON-LD items whose `@type` (string or array) names a venue-like
/// entity.
fn is_venue_item(item: &serde_json::Value) -> bool {
    let accepted = ["EventVenue", "LocalBusiness", "Place", "Hotel", "Restaurant"];
    let Some(type_node) = item.get("@type") else {
        return false;
    };

    if let Some(s) = type_node.as_str() {
        accepted.iter().any(|t| s.eq_ignore_ascii_case(t))
    } else if let Some(arr) = type_node.as_array() {
        arr.iter()
            .filter_map(|v| v.as_str())
            .any(|s| accepted.iter().any(|t| s.eq_ignore_ascii_case(t)))
    } else {
        false
    }
}

fn apply_jsonld_item(record: &mut PartialVenueRecord, item: &serde_json::Value) {
    if record.name.is_none() {
        record.name = str_field(item, "name");
    }
    if record.description.is_none() {
        record.description = str_field(item, "description");
    }

    let address = item.get("address");
    if record.address.is_none() {
        record.address = match address {
            Some(serde_json::Value::String(s)) => non_empty(s),
            Some(obj) => str_field(obj, "streetAddress"),
            None => None,
        };
    }
    if record.location.is_none() {
        record.location = address.and_then(|a| {
            let locality = str_field(a, "addressLocality")?;
            match str_field(a, "addressRegion") {
                Some(region) => Some(format!("{locality}, {region}")),
                None => Some(locality),
            }
        });
    }

    if let Some(aggregate) = item.get("aggregateRating") {
        if record.rating.is_none() {
            record.rating = rating_field(aggregate, "ratingValue");
        }
        if record.reviews_count.is_none() {
            record.reviews_count = count_field(aggregate, "reviewCount")
                .or_else(|| count_field(aggregate, "ratingCount"));
        }
    }

    if record.price.is_none() {
        record.price = price_field(item);
    }

    if record.contact.is_none() {
        let contact = ContactInfo {
            phone: str_field(item, "telephone"),
            email: str_field(item, "email"),
            website: str_field(item, "url"),
        };
        if !contact.is_empty() {
            record.contact = Some(contact);
        }
    }

    if record.images.is_empty() {
        record.images = url_list(item.get("image"));
    }

    if record.amenities.is_empty() {
        record.amenities = amenity_list(item.get("amenityFeature"));
    }
}

// ---------------------------------------------------------------------------
// Typed accessors over loosely-typed JSON
// ---------------------------------------------------------------------------

/// String accessor with a defined failure value: absent, non-string, and
/// empty-string all read as `None`.
fn str_field(item: &serde_json::Value, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_str()).and_then(non_empty)
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Rating accessor: accepts numbers and numeric strings, then validates the
/// canonical range. An ill-typed or out-of-range value reads as absent.
fn rating_field(item: &serde_json::Value, key: &str) -> Option<f64> {
    let raw = item.get(key)?;
    let result = match raw {
        serde_json::Value::Number(n) => {
            let value = n.as_f64()?;
            if (0.0..=5.0).contains(&value) {
                Ok(value)
            } else {
                Err(crate::normalize::NormalizeError::InvalidRating)
            }
        }
        serde_json::Value::String(s) => parse_rating(s),
        _ => return None,
    };
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(key, reason = e.reason(), "structured rating rejected");
            None
        }
    }
}

/// Count accessor: accepts unsigned numbers and numeric strings.
fn count_field(item: &serde_json::Value, key: &str) -> Option<u32> {
    match item.get(key)? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => parse_count(s).ok(),
        _ => None,
    }
}

/// Price from `priceRange` or an `offers` object; rejects digit-less ranges
/// like `"₹₹₹"`.
fn price_field(item: &serde_json::Value) -> Option<venuedb_core::Price> {
    if let Some(range) = str_field(item, "priceRange") {
        if let Ok(price) = price_from_display(&range, None) {
            return Some(price);
        }
    }

    let offers = item.get("offers")?;
    let raw = match offers.get("price")? {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => return None,
    };
    let mut price = price_from_display(&raw, None).ok()?;
    if let Some(currency) = str_field(offers, "priceCurrency") {
        price.currency = currency;
    }
    Some(price)
}

/// Image URL list: a bare string, an array of strings, an `ImageObject`, or
/// an array of `ImageObject`s.
fn url_list(value: Option<&serde_json::Value>) -> Vec<String> {
    let mut urls = Vec::new();
    match value {
        Some(serde_json::Value::String(s)) => urls.extend(non_empty(s)),
        Some(serde_json::Value::Array(items)) => {
            for item in items {
                match item {
                    serde_json::Value::String(s) => urls.extend(non_empty(s)),
                    obj => urls.extend(str_field(obj, "url")),
                }
            }
        }
        Some(obj) => urls.extend(str_field(obj, "url")),
        None => {}
    }
    urls
}

/// Amenity list: array of strings or of `LocationFeatureSpecification`s.
fn amenity_list(value: Option<&serde_json::Value>) -> Vec<String> {
    let Some(serde_json::Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => non_empty(s),
            obj => str_field(obj, "name"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Embedded state blobs
// ---------------------------------------------------------------------------

/// Find and parse state objects seeded at the known markers.
fn state_blobs(html: &str) -> Vec<serde_json::Value> {
    let mut blobs = Vec::new();
    for marker in STATE_MARKERS {
        for (pos, _) in html.match_indices(marker) {
            let tail = &html[pos + marker.len()..];
            if let Some(text) = extract_balanced_object(tail) {
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
                    blobs.push(value);
                }
            }
        }
    }
    blobs
}

/// Return the first balanced `{...}` object in `s`, honouring JSON string
/// escapes so braces inside string values do not unbalance the scan.
pub(crate) fn extract_balanced_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in s.as_bytes().iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Depth-first search for an object that looks like a venue payload: it has
/// a `name` plus at least one venue-indicative sibling key.
fn find_venue_node(value: &serde_json::Value) -> Option<&serde_json::Value> {
    const SIBLING_KEYS: [&str; 8] = [
        "address",
        "city",
        "rating",
        "capacity",
        "pricing",
        "price",
        "veg_price",
        "images",
    ];

    match value {
        serde_json::Value::Object(map) => {
            if map.get("name").and_then(|v| v.as_str()).is_some()
                && SIBLING_KEYS.iter().any(|k| map.contains_key(*k))
            {
                return Some(value);
            }
            map.values().find_map(find_venue_node)
        }
        serde_json::Value::Array(items) => items.iter().find_map(find_venue_node),
        _ => None,
    }
}

fn apply_state_node(record: &mut PartialVenueRecord, node: &serde_json::Value) {
    record.name = str_field(node, "name");
    record.address = str_field(node, "address");
    record.location = str_field(node, "city").or_else(|| str_field(node, "location"));
    record.rating = rating_field(node, "rating");
    record.reviews_count =
        count_field(node, "reviews_count").or_else(|| count_field(node, "review_count"));
    record.description = str_field(node, "description").or_else(|| str_field(node, "about"));
    record.images = url_list(node.get("images"));
    record.amenities = amenity_list(node.get("amenities"));

    record.price = ["veg_price", "starting_price", "price"].iter().find_map(|key| {
        let raw = match node.get(*key)? {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.clone(),
            _ => return None,
        };
        price_from_display(&raw, None).ok()
    });

    let contact = ContactInfo {
        phone: str_field(node, "phone"),
        email: str_field(node, "email"),
        website: str_field(node, "website"),
    };
    if !contact.is_empty() {
        record.contact = Some(contact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractorSource;

    // -----------------------------------------------------------------------
    // JSON-LD
    // -----------------------------------------------------------------------

    #[test]
    fn extracts_venue_fields_from_jsonld() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "EventVenue",
                "name": "Fiestaa Resort",
                "description": "Lakeside wedding resort.",
                "address": {
                    "@type": "PostalAddress",
                    "streetAddress": "Survey 12, Hennur Road",
                    "addressLocality": "Bangalore",
                    "addressRegion": "Karnataka"
                },
                "aggregateRating": {"@type": "AggregateRating", "ratingValue": "4.8", "reviewCount": 231},
                "telephone": "+91-80-5550-0100",
                "image": ["https://cdn.example.com/a.jpg", {"@type": "ImageObject", "url": "https://cdn.example.com/b.jpg"}],
                "priceRange": "₹50,000 onwards"
            }
            </script>
            </head></html>
        "#;

        let record = extract_structured(html);
        assert_eq!(record.source, ExtractorSource::StructuredData);
        assert_eq!(record.name.as_deref(), Some("Fiestaa Resort"));
        assert_eq!(record.address.as_deref(), Some("Survey 12, Hennur Road"));
        assert_eq!(record.location.as_deref(), Some("Bangalore, Karnataka"));
        assert!((record.rating.unwrap() - 4.8).abs() < 1e-9);
        assert_eq!(record.reviews_count, Some(231));
        assert_eq!(
            record.images,
            vec![
                "https://cdn.example.com/a.jpg".to_string(),
                "https://cdn.example.com/b.jpg".to_string()
            ]
        );
        let price = record.price.unwrap();
        assert_eq!(price.numeric_value, 50_000);
        assert_eq!(price.currency, "INR");
        assert_eq!(record.contact.unwrap().phone.as_deref(), Some("+91-80-5550-0100"));
    }

    #[test]
    fn non_venue_types_are_skipped() {
        let html = r#"
            <script type="application/ld+json">
            {"@type": "Article", "name": "Top 10 wedding venues"}
            </script>
        "#;
        let record = extract_structured(html);
        assert!(record.name.is_none());
    }

    #[test]
    fn array_type_containing_venue_type_is_accepted() {
        let html = r#"
            <script type="application/ld+json">
            {"@type": ["LocalBusiness", "EventVenue"], "name": "Grand Ballroom"}
            </script>
        "#;
        let record = extract_structured(html);
        assert_eq!(record.name.as_deref(), Some("Grand Ballroom"));
    }

    #[test]
    fn graph_container_is_expanded() {
        let html = r#"
            <script type="application/ld+json">
            {"@graph": [
                {"@type": "WebSite", "name": "wedmegood"},
                {"@type": "Place", "name": "The Tamarind Tree", "address": {"addressLocality": "Bangalore"}}
            ]}
            </script>
        "#;
        let record = extract_structured(html);
        assert_eq!(record.name.as_deref(), Some("The Tamarind Tree"));
        assert_eq!(record.location.as_deref(), Some("Bangalore"));
    }

    #[test]
    fn ill_typed_rating_reads_as_absent() {
        let html = r#"
            <script type="application/ld+json">
            {"@type": "EventVenue", "name": "X", "aggregateRating": {"ratingValue": "excellent"}}
            </script>
        "#;
        let record = extract_structured(html);
        assert_eq!(record.name.as_deref(), Some("X"));
        assert!(record.rating.is_none(), "non-numeric rating must be absent");
    }

    #[test]
    fn out_of_range_numeric_rating_reads_as_absent() {
        let html = r#"
            <script type="application/ld+json">
            {"@type": "EventVenue", "name": "X", "aggregateRating": {"ratingValue": 9.7}}
            </script>
        "#;
        let record = extract_structured(html);
        assert!(record.rating.is_none());
    }

    #[test]
    fn digitless_price_range_is_rejected() {
        let html = r#"
            <script type="application/ld+json">
            {"@type": "LocalBusiness", "name": "X", "priceRange": "₹₹₹"}
            </script>
        "#;
        let record = extract_structured(html);
        assert!(record.price.is_none());
    }

    #[test]
    fn malformed_jsonld_yields_all_absent_record() {
        let html = r#"<script type="application/ld+json">{not json}</script>"#;
        let record = extract_structured(html);
        assert!(record.is_empty());
    }

    // -----------------------------------------------------------------------
    // Embedded state blobs
    // -----------------------------------------------------------------------

    #[test]
    fn state_blob_is_used_when_no_jsonld_matches() {
        let html = r#"
            <script>
            window.__INITIAL_STATE__ = {"page": {"venue": {
                "name": "Lakeview Gardens",
                "city": "Mysore",
                "rating": 4.2,
                "veg_price": "₹1,200",
                "images": ["https://cdn.example.com/1.jpg"]
            }}};
            </script>
        "#;
        let record = extract_structured(html);
        assert_eq!(record.name.as_deref(), Some("Lakeview Gardens"));
        assert_eq!(record.location.as_deref(), Some("Mysore"));
        assert!((record.rating.unwrap() - 4.2).abs() < 1e-9);
        assert_eq!(record.price.unwrap().numeric_value, 1200);
    }

    #[test]
    fn balanced_object_scan_ignores_braces_inside_strings() {
        let s = r#" = {"a": "value with } brace", "b": {"c": 1}}; rest"#;
        let text = extract_balanced_object(s).unwrap();
        assert_eq!(text, r#"{"a": "value with } brace", "b": {"c": 1}}"#);
    }

    #[test]
    fn no_structured_data_is_not_an_error() {
        let record = extract_structured("<html><body><p>plain page</p></body></html>");
        assert!(record.is_empty());
        assert_eq!(record.source, ExtractorSource::StructuredData);
    }
}
