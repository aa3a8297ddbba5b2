//! # Cart Store
//!
//! Persistence of cart lines, one quantity per (user, SKU).
//!
//! - [`ActorCartStore`] - in-memory, carts owned by sharded actors (default)
//! - `PgCartStore` - PostgreSQL through sqlx (feature `postgres`)
//!
//! Both give `add_item` its atomic increment semantics on their own: the shard actor
//! applies one message at a time, the database applies one upsert statement.

pub mod actor;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use actor::ActorCartStore;
#[cfg(feature = "postgres")]
pub use postgres::PgCartStore;

use crate::model::{CartLine, SkuId, UserId};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached (actor gone, pool closed, ...).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The write broke a rule of the cart itself (zero quantity, overflow).
    #[error("Store rejected write: {0}")]
    Rejected(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Adds `count` units to the (user, sku) line, creating it when missing.
    async fn add_item(&self, user_id: UserId, sku_id: SkuId, count: u64) -> Result<(), StoreError>;

    /// Removes the (user, sku) line. A missing line is not an error.
    async fn delete_item(&self, user_id: UserId, sku_id: SkuId) -> Result<(), StoreError>;

    /// Removes every line of the user. An empty cart is not an error.
    async fn clear_cart(&self, user_id: UserId) -> Result<(), StoreError>;

    /// All lines of the user, ascending by SKU.
    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError>;
}
