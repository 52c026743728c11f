//! Mock payment processors and peers for integration tests.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use rinha_gateway::app::{config::BreakerConfig, spawn_pipeline, state::AppState, PipelineOptions};
use async_trait::async_trait;
use rinha_gateway::models::{PaymentRecord, PaymentsSummary};
use rinha_gateway::services::{
    MemoryRecordSink, PaymentProcessorClient, PaymentService, PeerClient, ProcessorUrls,
    RecordSink, SinkError, WorkerPool,
};
use rinha_gateway::services::AtomicMetrics;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Processor answering `POST /payments` with a programmable status and
/// remembering every body it received.
pub struct MockProcessor {
    pub addr: SocketAddr,
    status: Arc<AtomicU16>,
    received: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct MockState {
    status: Arc<AtomicU16>,
    received: Arc<Mutex<Vec<Value>>>,
    hang: Arc<AtomicBool>,
}

async fn accept_payment(State(state): State<MockState>, Json(body): Json<Value>) -> StatusCode {
    state.received.lock().push(body);
    if state.hang.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
    StatusCode::from_u16(state.status.load(Ordering::SeqCst)).unwrap_or(StatusCode::OK)
}

impl MockProcessor {
    pub async fn start(status: u16) -> Self {
        Self::start_with(status, false).await
    }

    /// Records each body, then never answers.
    pub async fn start_hanging() -> Self {
        Self::start_with(200, true).await
    }

    async fn start_with(status: u16, hang: bool) -> Self {
        let status = Arc::new(AtomicU16::new(status));
        let received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/payments", post(accept_payment))
            .with_state(MockState {
                status: status.clone(),
                received: received.clone(),
                hang: Arc::new(AtomicBool::new(hang)),
            });

        let addr = serve(app).await;
        Self {
            addr,
            status,
            received,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.received.lock().len()
    }

    pub fn received(&self) -> Vec<Value> {
        self.received.lock().clone()
    }

    pub fn received_ids(&self) -> Vec<String> {
        self.received
            .lock()
            .iter()
            .filter_map(|body| body["correlationId"].as_str().map(str::to_string))
            .collect()
    }
}

/// Peer instance answering `/internal-summary` with a fixed body.
pub async fn start_peer(summary: PaymentsSummary) -> String {
    let app = Router::new().route("/internal-summary", get(move || async move { Json(summary) }));
    format!("http://{}", serve(app).await)
}

/// Peer that never answers within any sensible timeout.
pub async fn start_hanging_peer() -> String {
    let app = Router::new().route(
        "/internal-summary",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Json(PaymentsSummary::default())
        }),
    );
    format!("http://{}", serve(app).await)
}

/// An address nothing listens on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn breaker_config(reset_timeout: Duration) -> BreakerConfig {
    BreakerConfig {
        failure_threshold: 5,
        reset_timeout,
    }
}

/// A service wired to the two mocks, for driving payments by hand.
pub fn service(
    default: &MockProcessor,
    fallback: &MockProcessor,
    breaker: BreakerConfig,
) -> (Arc<PaymentService>, Arc<MemoryRecordSink>) {
    let sink = Arc::new(MemoryRecordSink::new());
    let service = PaymentService::new(
        PaymentProcessorClient::new(Duration::from_secs(2)).unwrap(),
        ProcessorUrls {
            default: default.url(),
            fallback: fallback.url(),
        },
        breaker,
        sink.clone() as Arc<dyn RecordSink>,
        Arc::new(AtomicMetrics::new()),
    );
    (Arc::new(service), sink)
}

/// Sink whose every save fails, counting the attempts.
#[derive(Default)]
pub struct FailingRecordSink {
    attempts: AtomicUsize,
}

impl FailingRecordSink {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSink for FailingRecordSink {
    async fn save(&self, _record: PaymentRecord) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::UnknownProcessor("unavailable".to_string()))
    }

    async fn local_summary(&self) -> Result<PaymentsSummary, SinkError> {
        Ok(PaymentsSummary::default())
    }
}

/// Full queue + worker pool in front of the two mocks.
pub fn pipeline(
    default: &MockProcessor,
    fallback: &MockProcessor,
    workers: usize,
    peer: Option<String>,
) -> (AppState, WorkerPool, Arc<MemoryRecordSink>) {
    let sink = Arc::new(MemoryRecordSink::new());
    let (state, pool) = pipeline_with_sink(default, fallback, workers, peer, sink.clone());
    (state, pool, sink)
}

pub fn pipeline_with_sink(
    default: &MockProcessor,
    fallback: &MockProcessor,
    workers: usize,
    peer: Option<String>,
    sink: Arc<dyn RecordSink>,
) -> (AppState, WorkerPool) {
    let options = PipelineOptions {
        urls: ProcessorUrls {
            default: default.url(),
            fallback: fallback.url(),
        },
        breaker: breaker_config(Duration::from_secs(30)),
        workers,
        queue_capacity: 64,
        upstream_timeout: Duration::from_secs(2),
    };
    let peer = peer.map(|url| PeerClient::new(url, Duration::from_millis(500)).unwrap());
    spawn_pipeline(options, sink, peer).unwrap()
}

/// Polls `check` until it holds or two seconds pass.
pub async fn eventually<F: Fn() -> bool>(check: F) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
