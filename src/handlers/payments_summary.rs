use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, warn};

use crate::app::state::AppState;
use crate::models::PaymentsSummary;

async fn local_summary(state: &AppState) -> Result<PaymentsSummary, StatusCode> {
    state.service.sink().local_summary().await.map_err(|e| {
        error!(error = %e, "failed to read local summary");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// `GET /payments-summary`: this instance plus its peer. An unreachable peer
/// counts as zero.
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<PaymentsSummary>, StatusCode> {
    let local = local_summary(&state).await?;

    let peer = match &state.peer {
        Some(peer) => match peer.internal_summary().await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(peer = peer.base_url(), error = %e, "peer unreachable, using local summary only");
                PaymentsSummary::default()
            }
        },
        None => PaymentsSummary::default(),
    };

    Ok(Json(local.merge(&peer)))
}

/// `GET /internal-summary`: what the peer calls; local records only.
pub async fn get_internal_summary(
    State(state): State<AppState>,
) -> Result<Json<PaymentsSummary>, StatusCode> {
    Ok(Json(local_summary(&state).await?))
}
