use async_trait::async_trait;
use dashmap::DashMap;

use crate::models::{PaymentRecord, PaymentsSummary};
use crate::services::record_sink::{RecordSink, SinkError};

/// In-process store keyed by correlation id. A repeated id is appended, never
/// overwritten, so the summary stays a plain fold over every save.
#[derive(Default)]
pub struct MemoryRecordSink {
    storage: DashMap<String, Vec<PaymentRecord>>,
}

impl MemoryRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records_for(&self, correlation_id: &str) -> Vec<PaymentRecord> {
        self.storage
            .get(correlation_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.storage.iter().map(|entry| entry.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecordSink for MemoryRecordSink {
    async fn save(&self, record: PaymentRecord) -> Result<(), SinkError> {
        self.storage
            .entry(record.correlation_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn local_summary(&self) -> Result<PaymentsSummary, SinkError> {
        let mut summary = PaymentsSummary::default();
        for entry in self.storage.iter() {
            for record in entry.value() {
                summary.add(record.upstream, record.amount);
            }
        }
        Ok(summary)
    }
}
