//! Errors surfaced by [`CartService`](crate::service::CartService).

use crate::context::Interrupted;
use crate::model::SkuId;
use crate::product::LookupError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product service says the SKU does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(SkuId),

    /// The product service could not be used.
    #[error("Product service unavailable: {0}")]
    Upstream(LookupError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// `price * quantity`, or the running total, does not fit in a `u64`.
    #[error("Price overflow at {0}")]
    PriceOverflow(SkuId),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl From<LookupError> for CartError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::NotFound(sku_id) => Self::ProductNotFound(sku_id),
            LookupError::Interrupted(interrupted) => Self::Interrupted(interrupted),
            other => Self::Upstream(other),
        }
    }
}

impl CartError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProductNotFound(_))
    }
}
