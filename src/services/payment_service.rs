use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::app::config::BreakerConfig;
use crate::models::payment::{PaymentRecord, PaymentRequest, Upstream};
use crate::services::atomic_metrics::AtomicMetrics;
use crate::services::circuit_breaker::{BreakerError, BreakerSnapshot, CircuitBreaker};
use crate::services::payment_processor_client::{PaymentProcessorClient, UpstreamError};
use crate::services::record_sink::RecordSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Processed(Upstream),
    Dropped,
}

/// Base URLs of the two payment processors.
#[derive(Debug, Clone)]
pub struct ProcessorUrls {
    pub default: String,
    pub fallback: String,
}

/// Everything one worker needs to move a payment from the queue to the sink.
/// Shared by the whole pool behind an `Arc`.
pub struct PaymentService {
    processor_client: PaymentProcessorClient,
    urls: ProcessorUrls,
    default_breaker: CircuitBreaker,
    fallback_breaker: CircuitBreaker,
    sink: Arc<dyn RecordSink>,
    metrics: Arc<AtomicMetrics>,
}

impl PaymentService {
    pub fn new(
        processor_client: PaymentProcessorClient,
        urls: ProcessorUrls,
        breaker_config: BreakerConfig,
        sink: Arc<dyn RecordSink>,
        metrics: Arc<AtomicMetrics>,
    ) -> Self {
        Self {
            processor_client,
            urls,
            default_breaker: CircuitBreaker::new(Upstream::Primary.as_str(), breaker_config),
            fallback_breaker: CircuitBreaker::new(Upstream::Fallback.as_str(), breaker_config),
            sink,
            metrics,
        }
    }

    pub fn sink(&self) -> &Arc<dyn RecordSink> {
        &self.sink
    }

    pub fn metrics(&self) -> &Arc<AtomicMetrics> {
        &self.metrics
    }

    pub fn breaker_status(&self, upstream: Upstream) -> BreakerSnapshot {
        self.breaker(upstream).snapshot()
    }

    fn breaker(&self, upstream: Upstream) -> &CircuitBreaker {
        match upstream {
            Upstream::Primary => &self.default_breaker,
            Upstream::Fallback => &self.fallback_breaker,
        }
    }

    fn url(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::Primary => &self.urls.default,
            Upstream::Fallback => &self.urls.fallback,
        }
    }

    /// Tries the default processor, then the fallback once, and records the
    /// first acceptance. A breaker rejection and a failed call both lead to
    /// the fallback attempt.
    pub async fn process_single_payment(&self, payment: PaymentRequest) -> DispatchOutcome {
        debug!(correlation_id = %payment.correlation_id, "processing payment");

        let err = match self.try_processor(Upstream::Primary, &payment).await {
            Ok(()) => return self.record(&payment, Upstream::Primary).await,
            Err(e) => e,
        };
        debug!(
            correlation_id = %payment.correlation_id,
            error = %err,
            "default processor did not accept payment, trying fallback"
        );

        match self.try_processor(Upstream::Fallback, &payment).await {
            Ok(()) => self.record(&payment, Upstream::Fallback).await,
            Err(e) => {
                error!(
                    correlation_id = %payment.correlation_id,
                    error = %e,
                    "payment dropped, both processors failed"
                );
                self.metrics.increment_dropped();
                DispatchOutcome::Dropped
            }
        }
    }

    async fn try_processor(
        &self,
        upstream: Upstream,
        payment: &PaymentRequest,
    ) -> Result<(), BreakerError<UpstreamError>> {
        let url = self.url(upstream);
        self.breaker(upstream)
            .execute(|| self.processor_client.send(payment, url))
            .await
    }

    async fn record(&self, payment: &PaymentRequest, upstream: Upstream) -> DispatchOutcome {
        info!(correlation_id = %payment.correlation_id, %upstream, "payment processed");
        self.metrics.increment_processed(upstream);

        let record = PaymentRecord::new(payment, upstream, Utc::now());
        if let Err(e) = self.sink.save(record).await {
            // Swallowed: the processor has already accepted the payment.
            error!(correlation_id = %payment.correlation_id, error = %e, "failed to save payment");
            self.metrics.increment_sink_failures();
        }

        DispatchOutcome::Processed(upstream)
    }
}
