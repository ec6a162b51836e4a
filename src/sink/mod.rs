pub mod postgres;

pub use postgres::PostgresSink;

use async_trait::async_trait;

use crate::scrape::ExtractedRecord;

/// Destination for records of requests that asked to be saved.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Store one batch and return the number of records written.
    async fn store(&self, source_url: &str, records: &[ExtractedRecord]) -> anyhow::Result<u64>;
}
