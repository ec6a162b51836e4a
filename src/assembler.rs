use crate::scrape::{ExtractedRecord, ScrapeResponse};

pub const MAX_RESULTS: usize = 50;

/// Wrap records in the success envelope. `count` reports every record, while
/// `results` keeps only the first [`MAX_RESULTS`].
pub fn assemble(mut records: Vec<ExtractedRecord>) -> ScrapeResponse {
    let count = records.len();
    records.truncate(MAX_RESULTS);

    ScrapeResponse {
        success: true,
        count,
        results: records,
    }
}
