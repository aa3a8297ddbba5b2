//! # Cart Orchestration
//!
//! [`CartService`] composes a [`CartStore`](crate::store::CartStore) and a
//! [`ProductLookup`](crate::product::ProductLookup) into the four cart operations.
//!
//! | Operation | Store | Product service |
//! |-----------|-------|-----------------|
//! | `add_to_cart` | upsert after the check | existence check, not found rejects |
//! | `delete_item` | delete one line | - |
//! | `clear_cart` | delete all lines | - |
//! | `get_cart` | list lines | one lookup per line, not found skips |

pub mod cart_service;

pub use cart_service::{CartService, DEFAULT_LOOKUP_CONCURRENCY};
