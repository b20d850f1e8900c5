//! End-to-end pipeline scenarios over fixture HTML.
//!
//! These drive `extract` with static snapshots (no live session, so the
//! rendered-DOM extractor contributes an all-absent record) and check the
//! reconciliation laws: source priority, list union, and absence. The
//! rendered-DOM priority rung is exercised against hand-built partial
//! records through the public reconciler.

use venuedb_scraper::reconcile::reconcile;
use venuedb_scraper::{extract, AcquiredPage, ExtractorSource, PartialVenueRecord, ScrapeError};

// ---------------------------------------------------------------------------
// Scenario A: structured data beats the markup fallback on conflict
// ---------------------------------------------------------------------------

#[tokio::test]
async fn structured_price_wins_over_markup_price() {
    let html = r#"
        <html><head>
        <script type="application/ld+json">
        {"@type": "EventVenue", "name": "Fiestaa Resort", "priceRange": "₹50,000"}
        </script>
        </head><body>
        <h1>Fiestaa Resort</h1>
        <div class="VendorPricing"><p class="h5">Rs. 45000</p></div>
        </body></html>
    "#;

    let page = AcquiredPage::from_static(html.to_string());
    let record = extract(&page, "https://example.com/venues/fiestaa-1")
        .await
        .unwrap();

    let price = record.price.expect("price must reconcile");
    assert_eq!(price.numeric_value, 50_000, "structured value wins");
    assert_eq!(price.currency, "INR");
    assert_eq!(price.starting, "₹50,000");
}

// ---------------------------------------------------------------------------
// Scenario B: rendered DOM wins when structured data is absent entirely
// ---------------------------------------------------------------------------

#[test]
fn rendered_name_wins_when_no_structured_block_exists() {
    let structured = PartialVenueRecord::empty(ExtractorSource::StructuredData);
    let mut rendered = PartialVenueRecord::empty(ExtractorSource::RenderedDom);
    rendered.name = Some("Grand Ballroom".to_string());
    let mut markup = PartialVenueRecord::empty(ExtractorSource::Markup);
    markup.name = Some("Grand Ballroom Venue".to_string());

    let fields = reconcile(vec![markup, structured, rendered]);
    assert_eq!(fields.name.as_deref(), Some("Grand Ballroom"));
}

// ---------------------------------------------------------------------------
// Scenario C: structurally invalid page is the only pipeline failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_page_is_a_pipeline_error_with_no_partial_record() {
    let page = AcquiredPage::from_static("   ".to_string());
    let result = extract(&page, "https://example.com/venues/missing").await;
    assert!(matches!(result, Err(ScrapeError::InvalidPage { .. })));
}

// ---------------------------------------------------------------------------
// Union law: images merge across sources, first-seen order, deduplicated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn images_union_across_structured_and_markup() {
    let html = r#"
        <html><head>
        <script type="application/ld+json">
        {"@type": "EventVenue", "name": "X",
         "image": ["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"]}
        </script>
        </head><body>
        <img src="https://cdn.example.com/b.jpg">
        <img src="https://cdn.example.com/c.jpg">
        </body></html>
    "#;

    let page = AcquiredPage::from_static(html.to_string());
    let record = extract(&page, "https://example.com/venues/x").await.unwrap();

    assert_eq!(
        record.images.unwrap(),
        vec![
            "https://cdn.example.com/a.jpg",
            "https://cdn.example.com/b.jpg",
            "https://cdn.example.com/c.jpg",
        ],
        "deduplicated concatenation in source-priority order"
    );
}

// ---------------------------------------------------------------------------
// Absence law: nothing is defaulted, identity metadata is always present
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unrecognisable_page_yields_all_absent_but_valid_record() {
    let page = AcquiredPage::from_static("<html><body><main>hello</main></body></html>".to_string());
    let record = extract(&page, "https://example.com/venues/blank")
        .await
        .unwrap();

    assert!(record.name.is_none());
    assert!(record.price.is_none());
    assert!(record.rating.is_none());
    assert!(record.capacity.is_none(), "no empty-vec default");
    assert!(record.images.is_none());
    assert_eq!(record.source_url, "https://example.com/venues/blank");

    let json = serde_json::to_value(&record).unwrap();
    assert!(json["price"].is_null());
    assert!(json["capacity"].is_null());
    assert!(json["scraped_at"].is_string());
}

// ---------------------------------------------------------------------------
// Full-page reconciliation: structured, markup, and capacity keyed merge
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_page_reconciles_all_field_classes() {
    let html = r#"
        <html><head>
        <title>Fiestaa Resort n Events Venue | WedMeGood</title>
        <script type="application/ld+json">
        {
            "@type": "EventVenue",
            "name": "Fiestaa Resort n Events Venue",
            "address": {"streetAddress": "Hennur Road", "addressLocality": "Bangalore"},
            "aggregateRating": {"ratingValue": "4.8", "reviewCount": "231"},
            "telephone": "+91-80-5550-0100"
        }
        </script>
        </head><body>
        <div class="addr-right"><span>Hennur Road, Kothanur, Bangalore</span></div>
        <div class="VendorPricing">
            <h6 class="text-secondary">Veg price (per plate)</h6>
            <p class="h5">₹1,200</p>
        </div>
        <div class="AreasAvailable">
            <div class="flex-50"><h6>100 Seating | 150 Floating</h6><p>Poolside Lawn</p><div class="small">Outdoor</div></div>
        </div>
        <div class="AboutSection"><div class="faqs">
            <p>Catering policy</p><p>Inhouse catering only</p>
        </div></div>
        </body></html>
    "#;

    let page = AcquiredPage::from_static(html.to_string());
    let record = extract(&page, "https://example.com/venues/fiestaa-2")
        .await
        .unwrap();

    // Priority fields come from the structured block where it has evidence.
    assert_eq!(record.name.as_deref(), Some("Fiestaa Resort n Events Venue"));
    assert_eq!(record.address.as_deref(), Some("Hennur Road"));
    assert!((record.rating.unwrap() - 4.8).abs() < 1e-9);
    assert_eq!(record.reviews_count, Some(231));
    assert_eq!(
        record.contact.unwrap().phone.as_deref(),
        Some("+91-80-5550-0100")
    );

    // Markup fills what the structured block lacks.
    let price = record.price.unwrap();
    assert_eq!(price.numeric_value, 1200);
    assert_eq!(price.subtitle.as_deref(), Some("Veg price (per plate)"));

    let capacity = record.capacity.unwrap();
    assert_eq!(capacity.len(), 1);
    assert_eq!(capacity[0].area, "Poolside Lawn");
    assert_eq!(capacity[0].seating, Some(100));

    assert_eq!(
        record.policies.unwrap().catering.as_deref(),
        Some("Inhouse catering only")
    );
}
