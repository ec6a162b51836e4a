use tracing::{debug, error, info, instrument};
use url::Url;

use crate::{
    acquirer::{AcquireError, DocumentAcquirer},
    assembler::assemble,
    error::ScrapeError,
    extractor,
    normalizer::normalize,
    scrape::{ExtractedRecord, ScrapeRequest, ScrapeResponse},
    selector::validate_selector,
    sink::ResultSink,
};

/// Validate, acquire, extract, normalize and assemble one request.
///
/// Nothing touches the network before the container selector and URL have
/// been checked. A failing sink is logged and does not affect the response.
#[instrument(skip_all, fields(url = %request.url, strategy = %acquirer.strategy()))]
pub async fn run(
    request: &ScrapeRequest,
    acquirer: &dyn DocumentAcquirer,
    sink: Option<&dyn ResultSink>,
) -> Result<ScrapeResponse, ScrapeError> {
    let container_selector = request.container_selector();
    validate_selector(container_selector)?;

    let url = Url::parse(&request.url).map_err(AcquireError::from)?;

    info!(selector = container_selector, "starting scrape");
    let markup = acquirer.acquire(&url, container_selector).await?;

    let records: Vec<ExtractedRecord> = extractor::extract(
        &markup,
        container_selector,
        request.field_selectors(),
        acquirer.strategy(),
    )?
    .into_iter()
    .map(|raw| normalize(raw, &request.url))
    .collect();

    if request.save_to_db {
        save(sink, &request.url, &records).await;
    }

    Ok(assemble(records))
}

async fn save(sink: Option<&dyn ResultSink>, source_url: &str, records: &[ExtractedRecord]) {
    let Some(sink) = sink else {
        debug!("saveToDb requested but no database is configured");
        return;
    };

    match sink.store(source_url, records).await {
        Ok(stored) => info!(stored, "results saved"),
        Err(err) => error!(error = %err, "failed to save results"),
    }
}
