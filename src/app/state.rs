use std::sync::Arc;

use crate::queue::IntakeSender;
use crate::services::{PaymentService, PeerClient};

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub intake: IntakeSender,
    pub service: Arc<PaymentService>,
    pub peer: Option<PeerClient>,
    pub worker_count: usize,
}
