//! # Cart Orchestrator
//!
//! > **Shopping carts whose prices come from somewhere else.**
//!
//! This crate stores per-user cart lines (SKU + quantity) and, on read, prices each line
//! with the name and price an external product service reports *right now*. The product
//! service is slow, rate limited and occasionally wrong; this crate decides what a cart
//! operation means when it is.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Not found is not unavailable
//!
//! Every failure of the product service is sorted into one of two piles:
//! - **Not found** (`404`): the SKU is gone. Never retried. Adding it is rejected; a cart
//!   line pointing at it is silently left out of the priced view.
//! - **Unavailable** (transport errors, `429`/`420`, any other status): retried a bounded
//!   number of times with a fixed pause, then surfaced. A read never returns a partial cart.
//!
//! ### No global lock
//!
//! Carts are actor-owned entities. Users are hashed over a fixed set of shard actors; each
//! shard applies one message at a time, so "add two more" can never lose an increment,
//! while carts of different users are served in parallel.
//!
//! ## 🚀 Core Concepts
//!
//! ### Generics: The Power of `T`
//! [`ResourceActor<T: ActorEntity>`](framework::ResourceActor) is written once and owns any
//! keyed entity. [`Cart`](model::Cart) is the only entity here; it is materialized by its
//! first `AddItem` and evicted when its last line goes.
//!
//! ### Every await is cancellable
//! A [`RequestContext`](context::RequestContext) (cancellation token + optional deadline)
//! rides along with every call. Store calls, lookups and retry pauses all stop when it fires.
//!
//! ### Mocking: Testing without Pain
//! [`framework::mock`] scripts actor answers, including the failures a healthy actor never
//! gives. The product side is tested against scripted transports with Tokio's paused clock.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic actors, the sharded router and the mock client.
//!
//! ### 2. The Entity ([`cart_actor`], [`model`])
//! The [`Cart`](model::Cart) entity, its actions, and the read-side [`CartView`](model::CartView).
//!
//! ### 3. The Collaborators ([`store`], [`product`])
//! - [`CartStore`](store::CartStore) with the actor-backed store and, behind the `postgres`
//!   feature, a PostgreSQL one.
//! - [`ProductLookup`](product::ProductLookup) with [`ProductClient`](product::ProductClient),
//!   the retry loop over an HTTP transport.
//!
//! ### 4. The Orchestrator ([`service`])
//! [`CartService`](service::CartService): `add_to_cart`, `delete_item`, `clear_cart`, `get_cart`.
//!
//! ### 5. The Edge ([`lifecycle`], [`config`], [`validation`])
//! Wiring and shutdown, environment configuration, and input rules for the CLI.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! export PRODUCT_URL=http://localhost:8081
//! echo "add --sku 1001 --count 2
//! show" | RUST_LOG=info cargo run -- --user 1 script
//! ```

pub mod cart_actor;
pub mod config;
pub mod context;
pub mod error;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod product;
pub mod service;
pub mod store;
pub mod validation;

pub use context::{Interrupted, RequestContext};
pub use error::CartError;
pub use service::CartService;
