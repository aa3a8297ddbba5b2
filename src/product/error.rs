use crate::context::Interrupted;
use crate::model::SkuId;
use thiserror::Error;

/// Failure to resolve a SKU through the product service.
///
/// Only [`LookupError::NotFound`] means the product is gone; every other variant
/// says the service could not answer right now.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Product not found: {0}")]
    NotFound(SkuId),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rate limited: {0}")]
    RateLimited(u16),

    #[error("Bad status: {0}")]
    BadStatus(u16),

    #[error("Invalid product payload: {0}")]
    Decode(String),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether another attempt may succeed. The retry loop consults nothing else.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::RateLimited(_) | Self::BadStatus(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(LookupError::NotFound(SkuId(1)).is_not_found());
        assert!(!LookupError::NotFound(SkuId(1)).is_retryable());
        assert!(LookupError::RateLimited(429).is_retryable());
        assert!(LookupError::BadStatus(503).is_retryable());
        assert!(LookupError::Transport("reset".into()).is_retryable());
        assert!(!LookupError::Decode("eof".into()).is_retryable());
        assert!(!LookupError::Interrupted(Interrupted::Cancelled).is_retryable());
    }
}
