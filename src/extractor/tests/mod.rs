use std::fs;

use crate::acquirer::Strategy;
use crate::extractor::{
    CLIENT_RENDERED_HINT, Document, ExtractError, SELECTOR_MISMATCH_HINT, extract,
    extract_fields, looks_client_rendered,
};
use crate::scrape::FieldSelector;

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{}", name))
        .expect("Failed to read test fixture")
}

fn hackernews_fields() -> Vec<FieldSelector> {
    vec![
        FieldSelector::new("title", ".titleline > a"),
        FieldSelector::new("link", ".titleline > a").with_attribute("href"),
        FieldSelector::new("score", ".score"),
    ]
}

#[test]
fn test_extract_hackernews_rows() {
    let html = fixture("hackernews.html");
    let records = extract(&html, ".athing", &hackernews_fields(), Strategy::Static).unwrap();

    assert_eq!(records.len(), 3);

    let first = &records[0];
    assert_eq!(first.metadata["title"], "Rust 2024 edition is out");
    assert_eq!(first.metadata["link"], "https://example.org/rust-2024");
    assert!(!first.metadata.contains_key("score"));
    assert_eq!(first.first_href.as_deref(), Some("https://example.org/rust-2024"));

    assert_eq!(records[1].metadata["link"], "item?id=102");
}

#[test]
fn test_empty_attribute_value_is_absent() {
    let html = fixture("hackernews.html");
    let records = extract(&html, ".athing", &hackernews_fields(), Strategy::Static).unwrap();

    let third = &records[2];
    assert!(!third.metadata.contains_key("link"));
    assert_eq!(third.metadata["title"], "Untitled link");
    assert_eq!(third.metadata["score"], "57 points");
}

#[test]
fn test_bad_field_selector_does_not_disturb_other_fields() {
    let html = fixture("hackernews.html");
    let clean = extract(&html, ".athing", &hackernews_fields(), Strategy::Static).unwrap();

    let mut with_bad = hackernews_fields();
    with_bad.insert(1, FieldSelector::new("broken", "td[class="));
    with_bad.push(FieldSelector::new("missing", ".does-not-exist"));
    let noisy = extract(&html, ".athing", &with_bad, Strategy::Static).unwrap();

    assert_eq!(clean, noisy);
    assert!(noisy.iter().all(|record| !record.metadata.contains_key("broken")));
    assert!(noisy.iter().all(|record| !record.metadata.contains_key("missing")));
}

#[test]
fn test_extract_fields_reports_engine_rejections() {
    let html = fixture("hackernews.html");
    let document = Document::parse(&html);
    let rows = document.query(".athing").unwrap();

    let fields = vec![
        FieldSelector::new("title", ".titleline > a"),
        FieldSelector::new("broken", "a[href"),
        FieldSelector::new("skipped", ""),
    ];
    let (metadata, diagnostics) = extract_fields(&rows[0], &fields);

    assert_eq!(metadata.len(), 1);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].field, "broken");
    assert_eq!(diagnostics[0].selector, "a[href");
}

#[test]
fn test_extract_catalog_attributes_and_text() {
    let html = fixture("catalog.html");
    let fields = vec![
        FieldSelector::new("name", ".name"),
        FieldSelector::new("description", ".description"),
        FieldSelector::new("image", "img.thumb").with_attribute("src"),
        FieldSelector::new("more", "a.more").with_attribute(""),
    ];
    let records = extract(&html, "article.product", &fields, Strategy::Static).unwrap();

    assert_eq!(records.len(), 3);

    let desk = &records[0];
    assert_eq!(desk.metadata["name"], "Walnut desk");
    assert!(desk.metadata["description"].starts_with("Solid walnut desk."));
    assert_eq!(desk.metadata["image"], "/img/a-1.jpg");
    // An empty attribute name falls back to the element text.
    assert_eq!(desk.metadata["more"], "Details");
    assert_eq!(desk.first_href.as_deref(), Some("/products/a-1"));

    let clearance = &records[2];
    assert!(clearance.metadata.is_empty());
    assert!(clearance.text.contains("Clearance item with no name"));
    assert_eq!(clearance.first_href, None);
}

#[test]
fn test_container_only_request_yields_empty_metadata() {
    let html = fixture("catalog.html");
    let records = extract(&html, "article.product", &[], Strategy::Static).unwrap();

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|record| record.metadata.is_empty()));
}

#[test]
fn test_invalid_container_selector_is_fatal() {
    let html = fixture("catalog.html");
    let err = extract(&html, "article[", &[], Strategy::Static).unwrap_err();

    match &err {
        ExtractError::InvalidContainer { selector, .. } => assert_eq!(selector, "article["),
        other => panic!("Expected InvalidContainer, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Invalid CSS selector: \"article[\"."));
}

#[test]
fn test_no_containers_on_client_rendered_page_suggests_rendering() {
    let html = fixture("client_rendered.html");
    let err = extract(&html, ".product", &[], Strategy::Static).unwrap_err();

    assert_eq!(
        err,
        ExtractError::NoContainers {
            selector: ".product".to_string(),
            hint: CLIENT_RENDERED_HINT,
        }
    );
    assert!(err.to_string().contains("client-side rendering"));
}

#[test]
fn test_no_containers_under_rendered_strategy_has_plain_hint() {
    let html = fixture("client_rendered.html");
    let err = extract(&html, ".product", &[], Strategy::Rendered).unwrap_err();

    assert!(err.to_string().contains(SELECTOR_MISMATCH_HINT));
    assert!(!err.to_string().contains("client-side rendering"));
}

#[test]
fn test_no_containers_on_static_page_has_plain_hint() {
    let html = fixture("catalog.html");
    let err = extract(&html, ".listing", &[], Strategy::Static).unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "No elements found with selector \".listing\". {}",
            SELECTOR_MISMATCH_HINT
        )
    );
}

#[test]
fn test_client_rendering_heuristic() {
    assert!(looks_client_rendered(
        "<html><SCRIPT src=\"vue.js\"></SCRIPT></html>"
    ));
    assert!(looks_client_rendered(
        "<script>window.__ANGULAR__ = true</script>"
    ));
    assert!(!looks_client_rendered("<p>We love react and vue</p>"));
    assert!(!looks_client_rendered("<script src=\"jquery.js\"></script>"));
}

#[test]
fn test_malformed_html() {
    let html = "<html><body><ul><li class=\"item\">Unclosed <b>bold<li class=\"item\">Second";
    let records = extract(
        html,
        "li.item",
        &[FieldSelector::new("strong", "b")],
        Strategy::Static,
    )
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].metadata["strong"], "bold");
}
