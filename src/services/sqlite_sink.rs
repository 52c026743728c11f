use async_trait::async_trait;
use chrono::SecondsFormat;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{PaymentRecord, PaymentsSummary, Upstream, UpstreamSummary};
use crate::services::record_sink::{RecordSink, SinkError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS payments (
    id INTEGER PRIMARY KEY,
    correlation_id TEXT NOT NULL,
    amount REAL NOT NULL,
    processor TEXT NOT NULL,
    processed_at TEXT NOT NULL
)";

pub struct SqliteRecordSink {
    pool: SqlitePool,
}

impl SqliteRecordSink {
    /// Opens (creating if missing) the database at `path` in WAL mode and makes
    /// sure the `payments` table exists.
    pub async fn open(path: &str) -> Result<Self, SinkError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;

        info!(db_path = path, "payment store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordSink for SqliteRecordSink {
    async fn save(&self, record: PaymentRecord) -> Result<(), SinkError> {
        sqlx::query(
            "INSERT INTO payments (correlation_id, amount, processor, processed_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.correlation_id)
        .bind(record.amount)
        .bind(record.upstream.as_str())
        .bind(record.processed_at.to_rfc3339_opts(SecondsFormat::Nanos, true))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn local_summary(&self) -> Result<PaymentsSummary, SinkError> {
        let rows: Vec<(String, i64, f64)> = sqlx::query_as(
            "SELECT processor, COUNT(*), COALESCE(SUM(amount), 0.0) FROM payments GROUP BY processor",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut summary = PaymentsSummary::default();
        for (processor, count, total) in rows {
            let upstream = Upstream::from_tag(&processor)
                .ok_or_else(|| SinkError::UnknownProcessor(processor.clone()))?;
            *summary.get_mut(upstream) = UpstreamSummary::new(count as u64, total);
        }
        Ok(summary)
    }
}
