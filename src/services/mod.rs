pub mod atomic_metrics;
pub mod circuit_breaker;
pub mod memory_sink;
pub mod payment_processor_client;
pub mod payment_service;
pub mod peer_client;
pub mod record_sink;
pub mod sqlite_sink;
pub mod worker_pool;

pub use atomic_metrics::{AtomicMetrics, MetricsSnapshot};
pub use circuit_breaker::{BreakerError, BreakerSnapshot, CircuitBreaker, CircuitBreakerState};
pub use memory_sink::MemoryRecordSink;
pub use payment_processor_client::{PaymentProcessorClient, UpstreamError};
pub use payment_service::{DispatchOutcome, PaymentService, ProcessorUrls};
pub use peer_client::{PeerClient, PeerError};
pub use record_sink::{RecordSink, SinkError};
pub use sqlite_sink::SqliteRecordSink;
pub use worker_pool::WorkerPool;
