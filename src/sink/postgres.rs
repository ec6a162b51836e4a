use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, postgres::PgPoolOptions, types::Json};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{scrape::ExtractedRecord, sink::ResultSink};

#[derive(Clone)]
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ResultSink for PostgresSink {
    /// All records of one request share a `batch_id` and land in a single
    /// transaction.
    #[instrument(skip_all, fields(source_url = %source_url, records = records.len()))]
    async fn store(&self, source_url: &str, records: &[ExtractedRecord]) -> Result<u64> {
        let batch_id = Uuid::new_v4();
        let scraped_at = Utc::now();

        let mut tx = self.pool.begin().await?;
        let mut stored = 0;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO scrape_results
                      (id, batch_id, source_url, title, description, url, metadata, scraped_at)
                VALUES ($1, $2,       $3,         $4,    $5,          $6,  $7,       $8)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(batch_id)
            .bind(source_url)
            .bind(&record.title)
            .bind(&record.description)
            .bind(&record.url)
            .bind(Json(&record.metadata))
            .bind(scraped_at)
            .execute(&mut *tx)
            .await?;

            stored += 1;
        }

        tx.commit().await?;

        info!(%batch_id, stored, "scrape results stored");
        Ok(stored)
    }
}
