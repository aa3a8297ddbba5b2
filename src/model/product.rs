//! Product data as reported by the external product service.
//!
//! The crate never stores products; a `Product` lives for one request only.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for stock-keeping units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuId(pub u64);

impl From<u64> for SkuId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for SkuId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sku_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Unit price in the product service's minor currency unit.
    pub price: u64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}
