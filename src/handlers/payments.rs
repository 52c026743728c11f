use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::app::state::AppState;
use crate::models::payment::PaymentRequest;

/// `POST /payments`: validates, enqueues and answers 202 before any processor is called.
pub async fn create_payment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let request = match PaymentRequest::from_json(&body) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "invalid payment request");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    debug!(correlation_id = %request.correlation_id, "payment received");

    // Waits while the queue is full, pushing backpressure onto the client.
    if let Err(e) = state.intake.enqueue(request).await {
        error!(error = %e, "payment queue unavailable");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    state.service.metrics().increment_accepted();

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "status": "accepted",
            "message": "Payment queued for processing"
        })),
    ))
}
