use axum::{extract::State, response::Json};

use crate::app::state::AppState;
use crate::models::Upstream;

pub async fn get_metrics(State(state): State<AppState>) -> Json<serde_json::Value> {
    let service = &state.service;

    Json(serde_json::json!({
        "counters": service.metrics().snapshot(),
        "queue": {
            "depth": state.intake.depth(),
            "capacity": state.intake.capacity(),
        },
        "workers": state.worker_count,
        "circuit_breakers": {
            "default": service.breaker_status(Upstream::Primary),
            "fallback": service.breaker_status(Upstream::Fallback),
        }
    }))
}
