use crate::models::payment::PaymentRequest;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("payment queue is closed")]
pub struct QueueClosed;

/// Producer half, cloned into every HTTP handler.
#[derive(Clone)]
pub struct IntakeSender {
    inner: mpsc::Sender<PaymentRequest>,
}

/// Consumer half. Clones share one receiver, so any idle worker may take the
/// next payment.
#[derive(Clone)]
pub struct IntakeReceiver {
    inner: Arc<Mutex<mpsc::Receiver<PaymentRequest>>>,
}

pub fn create_queue(capacity: usize) -> (IntakeSender, IntakeReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        IntakeSender { inner: sender },
        IntakeReceiver {
            inner: Arc::new(Mutex::new(receiver)),
        },
    )
}

impl IntakeSender {
    /// Waits for a free slot when the queue is full; never drops the payment.
    pub async fn enqueue(&self, payment: PaymentRequest) -> Result<(), QueueClosed> {
        self.inner.send(payment).await.map_err(|_| QueueClosed)
    }

    pub fn capacity(&self) -> usize {
        self.inner.max_capacity()
    }

    /// Payments currently waiting for a worker.
    pub fn depth(&self) -> usize {
        self.inner.max_capacity() - self.inner.capacity()
    }
}

impl IntakeReceiver {
    /// Next payment, or `None` once every sender is gone and the queue is drained.
    pub async fn recv(&self) -> Option<PaymentRequest> {
        self.inner.lock().await.recv().await
    }
}
