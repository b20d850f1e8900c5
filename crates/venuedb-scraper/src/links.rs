//! Venue-link extraction from listing pages.

use std::collections::HashSet;

use regex::Regex;
use url::Url;

/// Pull venue and vendor profile URLs out of a listing page.
///
/// Relative hrefs are resolved against `base_url`; query strings and
/// fragments are stripped; first-seen order is preserved and duplicates are
/// dropped.
#[must_use]
pub fn extract_venue_links(html: &str, base_url: &str) -> Vec<String> {
    let href_re = Regex::new(r#"href\s*=\s*["']([^"']+)["']"#).expect("valid regex");
    let profile_re =
        Regex::new(r"/(?:wedding-venues|profile)/[^/?#]+-\d+/?$").expect("valid regex");
    let base = Url::parse(base_url).ok();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for caps in href_re.captures_iter(html) {
        let href = &caps[1];
        let absolute = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if let Some(base) = &base {
            match base.join(href) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => continue,
            }
        } else {
            continue;
        };

        let trimmed = absolute.split(['?', '#']).next().unwrap_or(absolute.as_str());
        if !profile_re.is_match(trimmed) {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            links.push(trimmed.to_string());
        }
    }

    links
}
