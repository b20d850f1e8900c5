//! Debug snapshots of acquired HTML.
//!
//! Mirrors the acquired page to disk for offline selector debugging.
//! Callers treat failures here as diagnostics to log, never as fatal.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::ScrapeError;

/// Write `content` under `dir` as `<unix-ts>_<label>.html`.
///
/// # Errors
///
/// Returns [`ScrapeError::Snapshot`] when the directory cannot be created or
/// the file cannot be written.
pub fn save_debug_html(dir: &Path, label: &str, content: &str) -> Result<PathBuf, ScrapeError> {
    std::fs::create_dir_all(dir).map_err(|e| ScrapeError::Snapshot {
        path: dir.display().to_string(),
        source: e,
    })?;

    let path = dir.join(format!("{}_{}.html", Utc::now().timestamp(), sanitize_label(label)));
    std::fs::write(&path, content).map_err(|e| ScrapeError::Snapshot {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "saved debug snapshot");
    Ok(path)
}

/// Filesystem-safe label: alphanumerics, dashes, and underscores, capped.
fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    cleaned.trim_matches('-').chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_sanitized_for_filenames() {
        assert_eq!(
            sanitize_label("https://example.com/venue?x=1"),
            "https---example-com-venue-x-1"
        );
        assert_eq!(sanitize_label("///"), "");
    }

    #[test]
    fn snapshot_round_trips_to_disk() {
        let dir = std::env::temp_dir().join(format!("venuedb-snap-{}", std::process::id()));
        let path = save_debug_html(&dir, "venue page", "<html></html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
        std::fs::remove_dir_all(&dir).ok();
    }
}
