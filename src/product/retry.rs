//! Retry policy and per-attempt classification.

use super::error::LookupError;
use super::transport::{RawReply, TransportError};
use crate::model::{Product, SkuId};
use std::time::Duration;

pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

/// Bounded retries with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
        }
    }
}

impl RetryPolicy {
    /// `attempts` is the total number of calls, raised to 1 if zero.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// What one attempt means for the loop.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Done(Product),
    Fail(LookupError),
    Retry(LookupError),
}

/// Retry or not is decided by [`LookupError::is_retryable`] alone.
pub(crate) fn classify(sku_id: SkuId, outcome: Result<RawReply, TransportError>) -> Step {
    match resolve(sku_id, outcome) {
        Ok(product) => Step::Done(product),
        Err(e) if e.is_retryable() => Step::Retry(e),
        Err(e) => Step::Fail(e),
    }
}

fn resolve(sku_id: SkuId, outcome: Result<RawReply, TransportError>) -> Result<Product, LookupError> {
    let reply = outcome.map_err(|e| LookupError::Transport(e.0))?;
    match reply.status {
        200 => serde_json::from_slice(&reply.body).map_err(|e| LookupError::Decode(e.to_string())),
        404 => Err(LookupError::NotFound(sku_id)),
        420 | 429 => Err(LookupError::RateLimited(reply.status)),
        status => Err(LookupError::BadStatus(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: &str) -> Result<RawReply, TransportError> {
        Ok(RawReply::new(status, body.as_bytes()))
    }

    #[test]
    fn test_success_decodes_product() {
        let step = classify(SkuId(1001), reply(200, r#"{"name":"Demo T-Shirt","price":1500}"#));
        assert_eq!(step, Step::Done(Product::new("Demo T-Shirt", 1500)));
    }

    #[test]
    fn test_terminal_outcomes() {
        assert_eq!(
            classify(SkuId(7), reply(404, "not found")),
            Step::Fail(LookupError::NotFound(SkuId(7)))
        );
        assert!(matches!(
            classify(SkuId(7), reply(200, "{broken")),
            Step::Fail(LookupError::Decode(_))
        ));
    }

    #[test]
    fn test_retryable_outcomes() {
        assert_eq!(
            classify(SkuId(7), reply(429, "")),
            Step::Retry(LookupError::RateLimited(429))
        );
        assert_eq!(
            classify(SkuId(7), reply(420, "")),
            Step::Retry(LookupError::RateLimited(420))
        );
        assert_eq!(
            classify(SkuId(7), reply(503, "")),
            Step::Retry(LookupError::BadStatus(503))
        );
        assert_eq!(
            classify(SkuId(7), Err(TransportError("connection refused".into()))),
            Step::Retry(LookupError::Transport("connection refused".into()))
        );
    }

    #[test]
    fn test_step_agrees_with_is_retryable() {
        let outcomes = vec![
            reply(200, "{broken"),
            reply(404, ""),
            reply(420, ""),
            reply(500, ""),
            Err(TransportError("reset".into())),
        ];
        for outcome in outcomes {
            match classify(SkuId(7), outcome) {
                Step::Retry(e) => assert!(e.is_retryable(), "{e} retried"),
                Step::Fail(e) => assert!(!e.is_retryable(), "{e} not retried"),
                Step::Done(product) => panic!("unexpected {product:?}"),
            }
        }
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.attempts(), 1);
        assert_eq!(RetryPolicy::default().attempts(), 3);
        assert_eq!(RetryPolicy::default().delay(), Duration::from_millis(300));
    }
}
