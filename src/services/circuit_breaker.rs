//! Three-state breaker gating one payment processor.
//!
//! ```text
//! Closed   -> Open      consecutive_failures reaches failure_threshold
//! Open     -> HalfOpen  first execute() after reset_timeout (lazy, time alone flips nothing)
//! HalfOpen -> Closed    work succeeds
//! HalfOpen -> Open      work fails, opened_at = now
//! ```
//!
//! The state mutex is taken once before the work and once after it, never across
//! it. Several callers may therefore run work while the breaker is half-open: probes
//! are not serialized and the last outcome to be recorded decides the state.

use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::app::config::BreakerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitBreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Error)]
pub enum BreakerError<E> {
    #[error("circuit breaker is open")]
    Open,
    #[error("{0}")]
    Inner(E),
}

impl<E> BreakerError<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakerSnapshot {
    pub mode: CircuitBreakerState,
    pub consecutive_failures: u32,
}

struct BreakerState {
    mode: CircuitBreakerState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

pub struct CircuitBreaker {
    name: &'static str,
    config: BreakerConfig,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: BreakerConfig) -> Self {
        Self {
            name,
            config,
            state: Mutex::new(BreakerState {
                mode: CircuitBreakerState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
        }
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let state = self.state.lock();
        BreakerSnapshot {
            mode: state.mode,
            consecutive_failures: state.consecutive_failures,
        }
    }

    /// Runs `work` unless the breaker refuses traffic, in which case it is
    /// never called and `BreakerError::Open` is returned.
    pub async fn execute<F, Fut, T, E>(&self, work: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.can_execute() {
            return Err(BreakerError::Open);
        }

        match work().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure();
                Err(BreakerError::Inner(e))
            }
        }
    }

    fn can_execute(&self) -> bool {
        let mut state = self.state.lock();
        if state.mode == CircuitBreakerState::Open {
            let elapsed = state
                .opened_at
                .map(|opened_at| opened_at.elapsed())
                .unwrap_or_default();
            if elapsed < self.config.reset_timeout {
                return false;
            }
            state.mode = CircuitBreakerState::HalfOpen;
            state.consecutive_failures = 0;
            info!(breaker = self.name, "circuit breaker half-open, probing");
        }
        true
    }

    fn record_success(&self) {
        let mut state = self.state.lock();
        state.consecutive_failures = 0;
        if state.mode == CircuitBreakerState::HalfOpen {
            state.mode = CircuitBreakerState::Closed;
            state.opened_at = None;
            info!(breaker = self.name, "circuit breaker closed");
        }
    }

    fn record_failure(&self) {
        let mut state = self.state.lock();
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);

        let trips = state.mode == CircuitBreakerState::HalfOpen
            || state.consecutive_failures >= self.config.failure_threshold;
        // Another caller may already have opened it; keep its opened_at.
        if trips && state.mode != CircuitBreakerState::Open {
            state.mode = CircuitBreakerState::Open;
            state.opened_at = Some(Instant::now());
            warn!(
                breaker = self.name,
                consecutive_failures = state.consecutive_failures,
                "circuit breaker opened"
            );
        }
    }
}
