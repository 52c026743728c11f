pub mod metrics;
pub mod payments;
pub mod payments_summary;

use axum::http::StatusCode;

pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}
