//! # Cart Actor
//!
//! Carts as actor-owned entities: one [`Cart`] per user, keyed by [`UserId`](crate::model::UserId).
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Cart`]
//! - [`error`] - [`CartEntityError`] for the rules a cart enforces on itself
//! - [`actions`] - [`CartAction`] and [`CartActionResult`]
//! - [`spawn_shards()`] - starts the shard actors that own all carts
//!
//! ## Why actions instead of Update?
//!
//! "Add two more of this SKU" depends on the quantity already stored. Sending it as an
//! action makes the read and the write happen inside the owning actor, in one step, so
//! two concurrent adds for the same user and SKU can never lose an increment.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::ShardedClient;
use crate::model::Cart;
use tokio::task::JoinHandle;

/// Request channel capacity of each shard actor.
pub const SHARD_BUFFER: usize = 64;

/// Starts `shard_count` cart actors and returns the router plus their task handles.
pub fn spawn_shards(shard_count: usize) -> (ShardedClient<Cart>, Vec<JoinHandle<()>>) {
    ShardedClient::spawn(shard_count, SHARD_BUFFER)
}
