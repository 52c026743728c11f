pub mod config;
pub mod state;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::handlers::{self, metrics, payments, payments_summary};
use crate::queue::create_queue;
use crate::services::{
    AtomicMetrics, MemoryRecordSink, PaymentProcessorClient, PaymentService, PeerClient,
    ProcessorUrls, RecordSink, SqliteRecordSink, WorkerPool,
};
use config::{BreakerConfig, Config};
use state::AppState;

/// Knobs of the dispatch pipeline. Production uses the constants in [`config`];
/// tests shrink timeouts and pool sizes.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub urls: ProcessorUrls,
    pub breaker: BreakerConfig,
    pub workers: usize,
    pub queue_capacity: usize,
    pub upstream_timeout: Duration,
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            urls: ProcessorUrls {
                default: config.default_base_url(),
                fallback: config.fallback_base_url(),
            },
            breaker: BreakerConfig::default(),
            workers: config::WORKER_COUNT,
            queue_capacity: config::QUEUE_CAPACITY,
            upstream_timeout: config::UPSTREAM_TIMEOUT,
        }
    }
}

/// Creates the intake queue and starts the worker pool behind it.
pub fn spawn_pipeline(
    options: PipelineOptions,
    sink: Arc<dyn RecordSink>,
    peer: Option<PeerClient>,
) -> anyhow::Result<(AppState, WorkerPool)> {
    let processor_client = PaymentProcessorClient::new(options.upstream_timeout)
        .context("failed to build payment processor HTTP client")?;

    let service = Arc::new(PaymentService::new(
        processor_client,
        options.urls,
        options.breaker,
        sink,
        Arc::new(AtomicMetrics::new()),
    ));

    let (intake, receiver) = create_queue(options.queue_capacity);
    let workers = WorkerPool::spawn(options.workers, receiver, service.clone());

    let state = AppState {
        intake,
        service,
        peer,
        worker_count: workers.len(),
    };
    Ok((state, workers))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/payments", post(payments::create_payment))
        .route("/payments-summary", get(payments_summary::get_summary))
        .route("/internal-summary", get(payments_summary::get_internal_summary))
        .route("/metrics", get(metrics::get_metrics))
        .with_state(state)
}

async fn open_sink(config: &Config) -> anyhow::Result<Arc<dyn RecordSink>> {
    match &config.db_path {
        Some(path) => {
            let sink = SqliteRecordSink::open(path)
                .await
                .with_context(|| format!("failed to open payment store at {path}"))?;
            Ok(Arc::new(sink))
        }
        None => {
            warn!("DB_PATH not set, processed payments are kept in memory only");
            Ok(Arc::new(MemoryRecordSink::new()))
        }
    }
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    info!(port = config.app_port, "starting payment gateway");

    let sink = open_sink(&config).await?;
    let peer = config
        .peer_base_url()
        .map(|url| PeerClient::new(url, config::PEER_TIMEOUT))
        .transpose()
        .context("failed to build peer HTTP client")?;
    if peer.is_none() {
        info!("PEER_URL not set, summaries cover this instance only");
    }

    let (state, _workers) = spawn_pipeline(PipelineOptions::from_config(&config), sink, peer)?;

    let addr = format!("0.0.0.0:{}", config.app_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // Payments still queued are dropped with the runtime.
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
