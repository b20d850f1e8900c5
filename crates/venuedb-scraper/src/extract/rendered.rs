//! Rendered-DOM extraction: field-targeted lookups against the live document.
//!
//! The only extractor allowed side effects: a single bottom-and-back scroll
//! nudges lazy galleries into mounting before the field sweep. Each field
//! gets one bounded wait; a timeout or missing element marks that field
//! absent and the sweep continues. No retries.

use std::time::Duration;

use fantoccini::{Client, Locator};

use venuedb_core::{CapacityRow, ContactInfo, Price};

use crate::extract::{is_gallery_image, policies_from_lines};
use crate::normalize::{
    capacity_row_from_text, location_from_address, parse_count, parse_rating, price_from_display,
};
use crate::types::{ExtractorSource, PartialVenueRecord};

const NAME_SELECTOR: &str = "div.vendor-details h1, h1.h4.text-bold";
const ADDRESS_SELECTOR: &str = "div.addr-right h6, div.addr-right span";
const PRICE_AMOUNT_SELECTOR: &str = "div.VendorPricing p.h5";
const PRICE_LABEL_SELECTOR: &str =
    "div.VendorPricing h6.text-secondary, div.VendorPricing p.text-secondary";
const RATING_SELECTOR: &str = "[itemprop='ratingValue'], div.rating-info span.h5";
const REVIEWS_SELECTOR: &str = "[itemprop='reviewCount'], div.rating-info .review-count";
const DESCRIPTION_SELECTOR: &str = "div.AboutSection div.info p";
const CAPACITY_ROW_SELECTOR: &str = "div.AreasAvailable .flex-50";
const FAQ_SELECTOR: &str = "div.AboutSection div.faqs p";
const AMENITY_SELECTOR: &str = "div.Amenities li, ul.amenities li";
const IMAGE_SELECTOR: &str = "img";
const PHONE_SELECTOR: &str = "a[href^='tel:']";
const EMAIL_SELECTOR: &str = "a[href^='mailto:']";

/// Sweep the canonical fields against the live rendered document.
///
/// Every lookup fails independently and silently; partial success is the
/// expected case, not a fault.
pub async fn extract_rendered(client: &Client, field_timeout: Duration) -> PartialVenueRecord {
    let mut record = PartialVenueRecord::empty(ExtractorSource::RenderedDom);

    trigger_lazy_content(client).await;

    record.name = lookup_text(client, NAME_SELECTOR, field_timeout).await;
    record.address = lookup_text(client, ADDRESS_SELECTOR, field_timeout).await;
    record.location = record.address.as_deref().and_then(location_from_address);
    record.price = lookup_price(client, field_timeout).await;

    if let Some(raw) = lookup_text(client, RATING_SELECTOR, field_timeout).await {
        match parse_rating(&raw) {
            Ok(value) => record.rating = Some(value),
            Err(e) => tracing::debug!(raw, reason = e.reason(), "rendered rating rejected"),
        }
    }
    if let Some(raw) = lookup_text(client, REVIEWS_SELECTOR, field_timeout).await {
        record.reviews_count = parse_count(&raw).ok();
    }

    record.description = lookup_text(client, DESCRIPTION_SELECTOR, field_timeout).await;
    record.capacity = lookup_capacity(client, field_timeout).await;

    let faq_lines = lookup_all_texts(client, FAQ_SELECTOR, field_timeout).await;
    let line_refs: Vec<&str> = faq_lines.iter().map(String::as_str).collect();
    let policies = policies_from_lines(&line_refs);
    if !policies.is_empty() {
        record.policies = Some(policies);
    }

    record.amenities = lookup_all_texts(client, AMENITY_SELECTOR, field_timeout).await;

    record.images = lookup_all_attrs(client, IMAGE_SELECTOR, "src", field_timeout)
        .await
        .into_iter()
        .filter(|url| is_gallery_image(url))
        .collect();

    let contact = ContactInfo {
        phone: lookup_attr(client, PHONE_SELECTOR, "href", field_timeout)
            .await
            .map(|href| href.trim_start_matches("tel:").to_string()),
        email: lookup_attr(client, EMAIL_SELECTOR, "href", field_timeout)
            .await
            .map(|href| href.trim_start_matches("mailto:").to_string()),
        website: None,
    };
    if !contact.is_empty() {
        record.contact = Some(contact);
    }

    record
}

/// One bottom-and-back scroll; lazy galleries mount on first viewport entry.
async fn trigger_lazy_content(client: &Client) {
    let script = "window.scrollTo(0, document.body.scrollHeight); window.scrollTo(0, 0);";
    if let Err(e) = client.execute(script, vec![]).await {
        tracing::debug!(error = %e, "lazy-load scroll failed");
    }
}

async fn lookup_price(client: &Client, bound: Duration) -> Option<Price> {
    let amount = lookup_text(client, PRICE_AMOUNT_SELECTOR, bound).await?;
    let label = lookup_text(client, PRICE_LABEL_SELECTOR, bound).await;
    match price_from_display(&amount, label.as_deref()) {
        Ok(price) => Some(price),
        Err(e) => {
            tracing::debug!(amount, reason = e.reason(), "rendered price rejected");
            None
        }
    }
}

async fn lookup_capacity(client: &Client, bound: Duration) -> Vec<CapacityRow> {
    lookup_all_texts(client, CAPACITY_ROW_SELECTOR, bound)
        .await
        .iter()
        .filter_map(|text| capacity_row_from_text(text))
        .collect()
}

/// Text of the first element matching `selector`, under one bounded wait.
async fn lookup_text(client: &Client, selector: &str, bound: Duration) -> Option<String> {
    let lookup = async {
        let element = client.find(Locator::Css(selector)).await.ok()?;
        element.text().await.ok()
    };
    match tokio::time::timeout(bound, lookup).await {
        Ok(text) => text.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(String::from),
        Err(_) => {
            tracing::debug!(selector, "field lookup timed out");
            None
        }
    }
}

/// Texts of every element matching `selector`, under one bounded wait for
/// the whole sweep.
async fn lookup_all_texts(client: &Client, selector: &str, bound: Duration) -> Vec<String> {
    let lookup = async {
        let elements = client.find_all(Locator::Css(selector)).await.ok()?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            if let Ok(text) = element.text().await {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    texts.push(trimmed.to_string());
                }
            }
        }
        Some(texts)
    };
    match tokio::time::timeout(bound, lookup).await {
        Ok(texts) => texts.unwrap_or_default(),
        Err(_) => {
            tracing::debug!(selector, "field lookup timed out");
            Vec::new()
        }
    }
}

async fn lookup_attr(client: &Client, selector: &str, attr: &str, bound: Duration) -> Option<String> {
    let lookup = async {
        let element = client.find(Locator::Css(selector)).await.ok()?;
        element.attr(attr).await.ok().flatten()
    };
    match tokio::time::timeout(bound, lookup).await {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(_) => {
            tracing::debug!(selector, attr, "field lookup timed out");
            None
        }
    }
}

async fn lookup_all_attrs(
    client: &Client,
    selector: &str,
    attr: &str,
    bound: Duration,
) -> Vec<String> {
    let lookup = async {
        let elements = client.find_all(Locator::Css(selector)).await.ok()?;
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            if let Ok(Some(value)) = element.attr(attr).await {
                values.push(value);
            }
        }
        Some(values)
    };
    match tokio::time::timeout(bound, lookup).await {
        Ok(values) => values.unwrap_or_default(),
        Err(_) => {
            tracing::debug!(selector, attr, "field lookup timed out");
            Vec::new()
        }
    }
}
