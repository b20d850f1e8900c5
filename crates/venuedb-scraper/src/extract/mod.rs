//! The three extraction strategies.
//!
//! Each extractor reads an independent view of the acquired page and returns
//! a source-tagged [`crate::types::PartialVenueRecord`]; the reconciler
//! merges them. Extractors never fail the pipeline; missing evidence is an
//! all-absent record.

pub mod markup;
pub mod rendered;
pub mod structured;

pub use markup::extract_markup;
pub use rendered::extract_rendered;
pub use structured::extract_structured;

use venuedb_core::Policies;

/// Gallery-image filter shared by the rendered and markup extractors: absolute
/// URLs only, chrome assets (logos, sprites, icons, vector art) excluded.
pub(crate) fn is_gallery_image(url: &str) -> bool {
    if !url.starts_with("http") {
        return false;
    }
    let lower = url.to_lowercase();
    !(lower.ends_with(".svg")
        || lower.contains("logo")
        || lower.contains("sprite")
        || lower.contains("icon"))
}

/// Map FAQ label/answer line pairs onto the canonical policy keys. Labels
/// are matched case-insensitively; the first answer per key wins.
pub(crate) fn policies_from_lines(lines: &[&str]) -> Policies {
    let mut policies = Policies::default();
    let mut i = 0;
    while i + 1 < lines.len() {
        let label = lines[i].to_lowercase();
        let slot = if label.contains("catering policy") {
            Some(&mut policies.catering)
        } else if label.contains("decor policy") {
            Some(&mut policies.decor)
        } else if label.contains("alcohol") {
            Some(&mut policies.alcohol)
        } else if label.contains("dj policy") || label.contains("music policy") {
            Some(&mut policies.music)
        } else if label.contains("timing") {
            Some(&mut policies.timing)
        } else if label.contains("parking") {
            Some(&mut policies.parking)
        } else {
            None
        };

        if let Some(slot) = slot {
            if slot.is_none() {
                let answer = lines[i + 1].trim();
                if !answer.is_empty() {
                    *slot = Some(answer.to_string());
                }
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    policies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_filter_rejects_chrome_assets() {
        assert!(is_gallery_image("https://cdn.example.com/gallery/1.jpg"));
        assert!(!is_gallery_image("/relative/2.jpg"));
        assert!(!is_gallery_image("https://cdn.example.com/logo.png"));
        assert!(!is_gallery_image("https://cdn.example.com/art.svg"));
    }

    #[test]
    fn policy_lines_pair_labels_with_answers() {
        let lines = [
            "Catering policy",
            "Inhouse catering only",
            "Room Count",
            "45",
            "DJ Policy",
            "Outside DJ permitted",
        ];
        let policies = policies_from_lines(&lines);
        assert_eq!(policies.catering.as_deref(), Some("Inhouse catering only"));
        assert_eq!(policies.music.as_deref(), Some("Outside DJ permitted"));
        assert!(policies.timing.is_none());
    }
}
