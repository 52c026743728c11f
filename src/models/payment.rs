use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(rename = "correlationId")]
    pub correlation_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed payment body: {0}")]
    Malformed(String),
    #[error("correlationId must not be empty")]
    EmptyCorrelationId,
    #[error("amount must be a positive number")]
    NonPositiveAmount,
}

impl PaymentRequest {
    pub fn new(correlation_id: impl Into<String>, amount: f64) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            amount,
        }
    }

    /// Parses and validates an inbound `POST /payments` body.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let request: PaymentRequest = serde_json::from_slice(body)
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.correlation_id.is_empty() {
            return Err(ValidationError::EmptyCorrelationId);
        }
        // `!(x > 0)` also rejects NaN
        if !(self.amount > 0.0) || !self.amount.is_finite() {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }
}

/// Which processor accepted a payment. On the wire the primary is `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Upstream {
    #[serde(rename = "default")]
    Primary,
    #[serde(rename = "fallback")]
    Fallback,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Primary => "default",
            Upstream::Fallback => "fallback",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "default" => Some(Upstream::Primary),
            "fallback" => Some(Upstream::Fallback),
            _ => None,
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body posted to a payment processor's `/payments` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalPayload {
    #[serde(rename = "correlationId")]
    pub correlation_id: String,
    pub amount: f64,
    #[serde(rename = "requestedAt")]
    pub requested_at: String,
}

impl ExternalPayload {
    pub fn new(payment: &PaymentRequest, requested_at: DateTime<Utc>) -> Self {
        Self {
            correlation_id: payment.correlation_id.clone(),
            amount: payment.amount,
            requested_at: requested_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub correlation_id: String,
    pub amount: f64,
    pub upstream: Upstream,
    pub processed_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(payment: &PaymentRequest, upstream: Upstream, processed_at: DateTime<Utc>) -> Self {
        Self {
            correlation_id: payment.correlation_id.clone(),
            amount: payment.amount,
            upstream,
            processed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_valid_body() {
        let request = PaymentRequest::from_json(br#"{"correlationId":"a","amount":10}"#).unwrap();
        assert_eq!(request, PaymentRequest::new("a", 10.0));
    }

    #[test]
    fn test_keeps_decimal_amount() {
        let request =
            PaymentRequest::from_json(br#"{"correlationId":"b","amount":25.50}"#).unwrap();
        assert_eq!(request.amount, 25.5);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        for body in [
            &br#"{"correlationId":"a","amount":0}"#[..],
            &br#"{"correlationId":"a","amount":-3.2}"#[..],
        ] {
            assert_eq!(
                PaymentRequest::from_json(body),
                Err(ValidationError::NonPositiveAmount)
            );
        }
    }

    #[test]
    fn test_rejects_empty_correlation_id() {
        assert_eq!(
            PaymentRequest::from_json(br#"{"correlationId":"","amount":1}"#),
            Err(ValidationError::EmptyCorrelationId)
        );
    }

    #[test]
    fn test_rejects_malformed_bodies() {
        for body in [
            &br#"{"amount":1}"#[..],
            &br#"{"correlationId":"a","amount":"1"}"#[..],
            &b"not json"[..],
            &b""[..],
        ] {
            assert!(matches!(
                PaymentRequest::from_json(body),
                Err(ValidationError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_upstream_wire_tags() {
        assert_eq!(serde_json::to_string(&Upstream::Primary).unwrap(), r#""default""#);
        assert_eq!(serde_json::to_string(&Upstream::Fallback).unwrap(), r#""fallback""#);
        assert_eq!(Upstream::from_tag("default"), Some(Upstream::Primary));
        assert_eq!(Upstream::from_tag("primary"), None);
    }

    #[test]
    fn test_external_payload_shape() {
        let at = Utc.with_ymd_and_hms(2025, 7, 15, 12, 34, 56).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let payload = ExternalPayload::new(&PaymentRequest::new("abc", 19.9), at);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["correlationId"], "abc");
        assert_eq!(value["amount"], 19.9);
        assert_eq!(value["requestedAt"], "2025-07-15T12:34:56.123456789Z");
        assert_eq!(value.as_object().unwrap().len(), 3);
    }
}
