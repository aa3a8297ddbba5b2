//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the pieces behind [`CartService`](crate::service::CartService).
//!
//! **Key Responsibilities:**
//! 1. **Actor Creation** - spawn the shard actors of the in-memory store
//! 2. **Dependency Injection** - hand store and product client to the service
//! 3. **Graceful Shutdown** - close the shard channels and wait for every actor task
//! 4. **Observability Setup** - [`setup_tracing`]
//!
//! ## Shutdown
//!
//! Actors stop when every sender of their channel is gone. [`CartSystem::shutdown`]
//! drops its service (and with it the store's shard clients) and then awaits the
//! actor tasks, so a panicked actor is reported instead of silently lost.

pub mod cart_system;
pub mod tracing;

pub use cart_system::{CartSystem, ShutdownError, StartupError};
pub use self::tracing::setup_tracing;
