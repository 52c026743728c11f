use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::models::PaymentsSummary;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("peer answered HTTP {0}")]
    Status(u16),
}

/// Fetches the sibling instance's local summary from `/internal-summary`.
#[derive(Clone)]
pub struct PeerClient {
    client: Client,
    base_url: String,
}

impl PeerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn internal_summary(&self) -> Result<PaymentsSummary, PeerError> {
        let response = self
            .client
            .get(format!("{}/internal-summary", self.base_url))
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(PeerError::Status(response.status().as_u16()));
        }

        Ok(response.json::<PaymentsSummary>().await?)
    }
}
