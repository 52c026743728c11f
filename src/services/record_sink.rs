use async_trait::async_trait;
use thiserror::Error;

use crate::models::{PaymentRecord, PaymentsSummary};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unknown processor tag in store: {0}")]
    UnknownProcessor(String),
}

/// Where processed payments end up. Shared by every worker, so implementations
/// do their own locking.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn save(&self, record: PaymentRecord) -> Result<(), SinkError>;

    /// Count and sum per processor. Sees every `save` that returned before the call.
    async fn local_summary(&self) -> Result<PaymentsSummary, SinkError>;
}
