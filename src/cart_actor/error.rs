//! Error types for the Cart actor.

use crate::model::SkuId;
use thiserror::Error;

/// Rules a cart enforces on its own lines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartEntityError {
    /// A line must never hold zero units.
    #[error("Invalid quantity 0 for {0}")]
    ZeroQuantity(SkuId),

    /// The accumulated quantity would not fit in a `u64`.
    #[error("Quantity overflow for {sku_id}: {current} + {added}")]
    QuantityOverflow { sku_id: SkuId, current: u64, added: u64 },
}
