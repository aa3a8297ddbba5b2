//! Cart records and the derived, priced cart view.
//!
//! # Actor Framework
//! [`Cart`] implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
//!
//! See [`impl ActorEntity for Cart`](#impl-ActorEntity-for-Cart) for details on the
//! actions ([`CartAction`](crate::cart_actor::CartAction)) it accepts.
use crate::model::SkuId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Type-safe identifier for cart owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user_{}", self.0)
    }
}

/// One stored (sku, quantity) pair of a user's cart.
///
/// `quantity` is never zero for a line that exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub sku_id: SkuId,
    pub quantity: u64,
}

impl CartLine {
    pub fn new(sku_id: SkuId, quantity: u64) -> Self {
        Self { sku_id, quantity }
    }
}

/// A user's stored cart: quantities keyed by SKU.
///
/// The `BTreeMap` keeps lines ordered by ascending SKU, which is the order
/// [`Cart::lines`] reports them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub user_id: UserId,
    pub(crate) lines: BTreeMap<SkuId, u64>,
}

impl Cart {
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            lines: BTreeMap::new(),
        }
    }

    /// Lines in ascending SKU order.
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines
            .iter()
            .map(|(sku_id, quantity)| CartLine::new(*sku_id, *quantity))
            .collect()
    }

    pub fn quantity_of(&self, sku_id: SkuId) -> Option<u64> {
        self.lines.get(&sku_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One priced line of a [`CartView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku_id: SkuId,
    pub name: String,
    #[serde(rename = "count")]
    pub quantity: u64,
    pub price: u64,
}

/// Read-only projection of a cart, priced at the time it was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_price: u64,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
