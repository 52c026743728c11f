use serde::{Deserialize, Serialize};

use crate::models::payment::Upstream;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamSummary {
    #[serde(rename = "totalRequests")]
    pub total_requests: u64,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
}

impl UpstreamSummary {
    pub fn new(total_requests: u64, total_amount: f64) -> Self {
        Self {
            total_requests,
            total_amount,
        }
    }

    fn merge(&self, other: &UpstreamSummary) -> UpstreamSummary {
        UpstreamSummary {
            total_requests: self.total_requests.saturating_add(other.total_requests),
            total_amount: self.total_amount + other.total_amount,
        }
    }
}

/// Body of `/payments-summary` and `/internal-summary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentsSummary {
    #[serde(rename = "default")]
    pub primary: UpstreamSummary,
    pub fallback: UpstreamSummary,
}

impl PaymentsSummary {
    pub fn new(primary: UpstreamSummary, fallback: UpstreamSummary) -> Self {
        Self { primary, fallback }
    }

    pub fn add(&mut self, upstream: Upstream, amount: f64) {
        let slot = self.get_mut(upstream);
        slot.total_requests += 1;
        slot.total_amount += amount;
    }

    pub fn get(&self, upstream: Upstream) -> &UpstreamSummary {
        match upstream {
            Upstream::Primary => &self.primary,
            Upstream::Fallback => &self.fallback,
        }
    }

    pub fn get_mut(&mut self, upstream: Upstream) -> &mut UpstreamSummary {
        match upstream {
            Upstream::Primary => &mut self.primary,
            Upstream::Fallback => &mut self.fallback,
        }
    }

    pub fn merge(&self, other: &PaymentsSummary) -> PaymentsSummary {
        PaymentsSummary {
            primary: self.primary.merge(&other.primary),
            fallback: self.fallback.merge(&other.fallback),
        }
    }
}
