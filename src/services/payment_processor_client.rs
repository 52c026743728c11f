use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::models::payment::{ExternalPayload, PaymentRequest};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("payment processor timed out")]
    Timeout,
    #[error("payment processor unreachable: {0}")]
    Transport(reqwest::Error),
    #[error("payment processor answered HTTP {0}")]
    Status(u16),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Transport(e)
        }
    }
}

/// Stateless sender shared by every worker; reqwest pools connections internally.
#[derive(Clone)]
pub struct PaymentProcessorClient {
    client: Client,
}

impl PaymentProcessorClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self { client })
    }

    /// POSTs the payment to `<base_url>/payments`. Only a 2xx answer counts as
    /// accepted; the response body is ignored.
    pub async fn send(&self, payment: &PaymentRequest, base_url: &str) -> Result<(), UpstreamError> {
        let payload = ExternalPayload::new(payment, Utc::now());

        let response = self
            .client
            .post(format!("{}/payments", base_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(UpstreamError::Status(status.as_u16()))
        }
    }
}
