use super::error::LookupError;
use super::retry::{classify, RetryPolicy, Step};
use super::transport::{HttpTransport, ProductTransport, TransportError};
use crate::context::RequestContext;
use crate::model::{Product, SkuId};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Resolves a SKU to its current name and price.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn get_product(&self, ctx: &RequestContext, sku_id: SkuId) -> Result<Product, LookupError>;
}

/// Product lookups with bounded retries over a [`ProductTransport`].
#[derive(Debug, Clone)]
pub struct ProductClient<T = HttpTransport> {
    transport: T,
    policy: RetryPolicy,
}

enum State {
    Attempt { attempt: u32 },
    Pause { attempt: u32, last: LookupError },
    Exhausted { last: LookupError },
}

impl<T: ProductTransport> ProductClient<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl ProductClient<HttpTransport> {
    /// Client for the HTTP product service at `base_url`.
    pub fn http(
        base_url: &str,
        token: impl Into<String>,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new(base_url, token, timeout)?, policy))
    }
}

#[async_trait]
impl<T: ProductTransport> ProductLookup for ProductClient<T> {
    /// Tries up to `policy.attempts()` times, pausing `policy.delay()` between tries.
    ///
    /// Ends on the first success, on a terminal outcome (not found, undecodable body,
    /// interrupted), or after the last attempt with the last retryable error.
    #[instrument(skip(self, ctx))]
    async fn get_product(&self, ctx: &RequestContext, sku_id: SkuId) -> Result<Product, LookupError> {
        let max = self.policy.attempts();
        let mut state = State::Attempt { attempt: 1 };

        loop {
            state = match state {
                State::Attempt { attempt } => {
                    let outcome = ctx.run(self.transport.fetch(sku_id)).await?;
                    match classify(sku_id, outcome) {
                        Step::Done(product) => {
                            debug!(attempt, ?product, "Product resolved");
                            return Ok(product);
                        }
                        Step::Fail(e) => {
                            debug!(attempt, error = %e, "Lookup failed");
                            return Err(e);
                        }
                        Step::Retry(e) if attempt < max => {
                            warn!(attempt, max, error = %e, "Lookup attempt failed, retrying");
                            State::Pause { attempt, last: e }
                        }
                        Step::Retry(e) => {
                            warn!(attempt, max, error = %e, "Lookup attempts exhausted");
                            State::Exhausted { last: e }
                        }
                    }
                }
                State::Pause { attempt, last } => {
                    if let Err(interrupted) = ctx.sleep(self.policy.delay()).await {
                        debug!(attempt, last = %last, "Retry pause interrupted");
                        return Err(interrupted.into());
                    }
                    State::Attempt {
                        attempt: attempt + 1,
                    }
                }
                State::Exhausted { last } => return Err(last),
            };
        }
    }
}
