//! Generic keyed-actor framework for resource management.
//!
//! This module provides the building blocks the cart store is made of: entities
//! owned by a single Tokio task, addressed by key, mutated only through messages.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that resource types implement to be managed by actors
//! - [`ResourceActor`] - Generic actor that owns a map of entities
//! - [`ResourceClient`] - Type-safe handle for sending requests to one actor
//! - [`ShardedClient`] - Routes each key to one of several actors
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;
pub mod shard;

// Re-export core types for convenience
pub use self::core::*;
pub use shard::ShardedClient;
