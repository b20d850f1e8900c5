//! JSON persistence for scraped records and URL lists.

use std::fs;
use std::path::Path;

use anyhow::Context;

use venuedb_core::VenueRecord;

pub(crate) fn write_records(path: &Path, records: &[VenueRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub(crate) fn read_records(path: &Path) -> anyhow::Result<Vec<VenueRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

pub(crate) fn read_url_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(content.lines().map(ToString::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn records_round_trip_through_the_json_file() {
        let dir = std::env::temp_dir().join(format!("venuedb-persist-{}", std::process::id()));
        let path = dir.join("records.json");

        let records = vec![VenueRecord {
            name: Some("Fiestaa Resort".to_string()),
            location: None,
            address: None,
            price: None,
            rating: Some(4.8),
            reviews_count: None,
            description: None,
            capacity: None,
            amenities: None,
            policies: None,
            contact: None,
            images: None,
            source_url: "https://example.com/v/1".to_string(),
            scraped_at: Utc::now(),
        }];

        write_records(&path, &records).unwrap();
        let loaded = read_records(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name.as_deref(), Some("Fiestaa Resort"));
        assert!(loaded[0].price.is_none());

        std::fs::remove_dir_all(&dir).ok();
    }
}
