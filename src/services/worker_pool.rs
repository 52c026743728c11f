use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::queue::IntakeReceiver;
use crate::services::payment_service::PaymentService;

/// Fixed set of tasks draining the intake queue. Each worker finishes one
/// payment before taking the next.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn spawn(size: usize, receiver: IntakeReceiver, service: Arc<PaymentService>) -> Self {
        info!(workers = size, "starting payment workers");

        let handles = (0..size)
            .map(|id| {
                let receiver = receiver.clone();
                let service = service.clone();
                tokio::spawn(async move {
                    while let Some(payment) = receiver.recv().await {
                        service.process_single_payment(payment).await;
                    }
                    debug!(worker = id, "intake queue closed, worker exiting");
                })
            })
            .collect();

        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every worker; they only finish once the queue is closed and drained.
    pub async fn join(self) {
        futures::future::join_all(self.handles).await;
    }
}
