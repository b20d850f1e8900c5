//! Markup fallback extraction: selector/pattern rules over the static HTML.
//!
//! Lowest-confidence, highest-availability source. No rendering, no waiting,
//! no side effects; returning more absent fields than the other extractors
//! is expected and never fails the pipeline.

use regex::Regex;

use venuedb_core::{CapacityRow, ContactInfo, Policies, Price};

use crate::extract::{is_gallery_image, policies_from_lines};
use crate::normalize::{
    capacity_row_from_text, location_from_address, parse_count, parse_rating, price_from_display,
};
use crate::types::{ExtractorSource, PartialVenueRecord};

/// Extract venue fields from the static HTML snapshot.
#[must_use]
pub fn extract_markup(html: &str) -> PartialVenueRecord {
    let mut record = PartialVenueRecord::empty(ExtractorSource::Markup);

    record.name = extract_name(html);
    record.address = extract_address(html);
    record.location = record.address.as_deref().and_then(location_from_address);
    record.price = extract_price(html);
    (record.rating, record.reviews_count) = extract_rating_and_reviews(html);
    record.description = extract_description(html);
    record.capacity = extract_capacity(html);
    record.policies = extract_policies(html);
    record.contact = extract_contact(html);
    record.images = extract_images(html);
    record.amenities = extract_amenities(html);

    record
}

fn extract_name(html: &str) -> Option<String> {
    let h1_re = Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid regex");
    if let Some(caps) = h1_re.captures(html) {
        if let Some(name) = non_empty(&strip_tags(&caps[1])) {
            return Some(name);
        }
    }

    // The page title carries the venue name before the site-name separator.
    let title_re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex");
    let title = strip_tags(&title_re.captures(html)?[1]);
    non_empty(title.split('|').next().unwrap_or(""))
}

fn extract_address(html: &str) -> Option<String> {
    let start = html.find("addr-right")?;
    let tail = &html[start..];
    // Skip the attribute remnant up to the enclosing tag's close, then read
    // up to the block's closing div.
    let body_start = tail.find('>')? + 1;
    let body = &tail[body_start..];
    let end = body.find("</div>").unwrap_or_else(|| body.len().min(600));
    non_empty(&strip_tags(window(body, 0, end)))
}

fn extract_price(html: &str) -> Option<Price> {
    let start = html.find("VendorPricing")?;
    let section = window(html, start, 8000);

    let amount_re =
        Regex::new(r#"(?is)<p[^>]*class="[^"]*\bh5\b[^"]*"[^>]*>(.*?)</p>"#).expect("valid regex");
    let raw = strip_tags(&amount_re.captures(section)?[1]);

    let label_re = Regex::new(r#"(?is)<(?:h6|p)[^>]*class="[^"]*text-secondary[^"]*"[^>]*>(.*?)</(?:h6|p)>"#)
        .expect("valid regex");
    let subtitle = label_re.captures(section).map(|c| strip_tags(&c[1]));

    match price_from_display(&raw, subtitle.as_deref()) {
        Ok(price) => Some(price),
        Err(e) => {
            tracing::debug!(raw, reason = e.reason(), "markup price rejected");
            None
        }
    }
}

fn extract_rating_and_reviews(html: &str) -> (Option<f64>, Option<u32>) {
    let re = Regex::new(r"(\d(?:\.\d+)?)\s*\(\s*([\d,]+)\s+reviews?\s*\)").expect("valid regex");
    let text = visible_text(html);
    for caps in re.captures_iter(&text) {
        if let Ok(rating) = parse_rating(&caps[1]) {
            return (Some(rating), parse_count(&caps[2]).ok());
        }
    }
    (None, None)
}

fn extract_description(html: &str) -> Option<String> {
    let meta_re = Regex::new(
        r#"(?is)<meta[^>]+name\s*=\s*["']description["'][^>]*content\s*=\s*["']([^"']+)["']"#,
    )
    .expect("valid regex");
    if let Some(caps) = meta_re.captures(html) {
        if let Some(description) = non_empty(&decode_entities(&caps[1])) {
            return Some(description);
        }
    }

    // Fall back to the first paragraph of the about-section info block; the
    // sibling FAQ block also holds <p> tags, so anchor inside `info`.
    let start = html.find("AboutSection")?;
    let section = window(html, start, 8000);
    let info_start = section.find("\"info")?;
    let info = window(section, info_start, 4000);
    let p_re = Regex::new(r"(?is)<p[^>]*>(.*?)</p>").expect("valid regex");
    non_empty(&strip_tags(&p_re.captures(info)?[1]))
}

fn extract_capacity(html: &str) -> Vec<CapacityRow> {
    let Some(start) = html.find("AreasAvailable") else {
        return Vec::new();
    };
    let section = window(html, start, 16_000);

    section
        .split("flex-50")
        .skip(1)
        .filter_map(|chunk| {
            // Skip the attribute remnant up to the enclosing tag's close.
            let body_start = chunk.find('>').map_or(0, |i| i + 1);
            let block = window(chunk, body_start, 1200);
            capacity_row_from_text(&tags_to_newlines(block))
        })
        .collect()
}

fn extract_policies(html: &str) -> Option<Policies> {
    let start = html.find("faqs")?;
    let section = window(html, start, 8000);
    let text = tags_to_newlines(section);
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let policies = policies_from_lines(&lines);
    (!policies.is_empty()).then_some(policies)
}

fn extract_contact(html: &str) -> Option<ContactInfo> {
    let tel_re = Regex::new(r#"href\s*=\s*["']tel:([^"']+)["']"#).expect("valid regex");
    let mail_re = Regex::new(r#"href\s*=\s*["']mailto:([^"']+)["']"#).expect("valid regex");

    let contact = ContactInfo {
        phone: tel_re
            .captures(html)
            .and_then(|c| non_empty(&decode_entities(&c[1]))),
        email: mail_re
            .captures(html)
            .and_then(|c| non_empty(&decode_entities(&c[1]))),
        website: None,
    };
    (!contact.is_empty()).then_some(contact)
}

fn extract_images(html: &str) -> Vec<String> {
    let img_re = Regex::new(r#"(?is)<img[^>]+(?:data-src|src)\s*=\s*["']([^"']+)["']"#)
        .expect("valid regex");

    let mut seen = std::collections::HashSet::new();
    let mut images = Vec::new();
    for caps in img_re.captures_iter(html) {
        let url = decode_entities(caps[1].trim());
        if is_gallery_image(&url) && seen.insert(url.clone()) {
            images.push(url);
        }
    }
    images
}

fn extract_amenities(html: &str) -> Vec<String> {
    let Some(start) = ["Amenities", "amenities", "Facilities", "facilities"]
        .iter()
        .find_map(|marker| html.find(marker))
    else {
        return Vec::new();
    };
    let section = window(html, start, 6000);
    let li_re = Regex::new(r"(?is)<li[^>]*>(.*?)</li>").expect("valid regex");

    li_re
        .captures_iter(section)
        .filter_map(|caps| non_empty(&strip_tags(&caps[1])))
        .filter(|item| item.len() < 60)
        .collect()
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Slice a window of at most `len` bytes starting at `start`, snapped back to
/// a valid char boundary.
fn window(html: &str, start: usize, len: usize) -> &str {
    let mut end = (start + len).min(html.len());
    while !html.is_char_boundary(end) {
        end -= 1;
    }
    &html[start..end]
}

/// Visible page text: script/style bodies removed, tags stripped.
fn visible_text(html: &str) -> String {
    let script_re = Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("valid regex");
    strip_tags(&script_re.replace_all(html, " "))
}

fn strip_tags(fragment: &str) -> String {
    let comment_re = Regex::new(r"(?s)<!--.*?-->").expect("valid regex");
    let tag_re = Regex::new(r"(?s)<[^>]*>").expect("valid regex");
    let no_comments = comment_re.replace_all(fragment, " ");
    let no_tags = tag_re.replace_all(&no_comments, " ");
    collapse_whitespace(&decode_entities(&no_tags))
}

/// Like [`strip_tags`], but tag boundaries become line breaks so downstream
/// line-oriented parsing (capacity rows, FAQ pairs) keeps its structure.
fn tags_to_newlines(fragment: &str) -> String {
    let comment_re = Regex::new(r"(?s)<!--.*?-->").expect("valid regex");
    let tag_re = Regex::new(r"(?s)<[^>]*>").expect("valid regex");
    let no_comments = comment_re.replace_all(fragment, "\n");
    let broken = tag_re.replace_all(&no_comments, "\n");
    decode_entities(&broken)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
