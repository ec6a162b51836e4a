#![no_main]

use libfuzzer_sys::fuzz_target;

use harvester::acquirer::Strategy;
use harvester::extractor::extract;
use harvester::normalizer::normalize;
use harvester::scrape::FieldSelector;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    let fields = [
        FieldSelector::new("title", "h1, h2, a"),
        FieldSelector::new("link", "a").with_attribute("href"),
        FieldSelector::new("description", "p"),
    ];

    // Neither extraction nor normalization may panic on arbitrary markup.
    if let Ok(records) = extract(&html, "div, li, article", &fields, Strategy::Static) {
        for raw in records {
            let record = normalize(raw, "https://example.com/list");
            assert!(record.description.chars().count() <= 140);
        }
    }
});
