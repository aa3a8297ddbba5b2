//! # Product Lookup
//!
//! Talks to the external product service and owns the retry policy.
//!
//! - [`transport`] - one HTTP round trip, no interpretation
//! - [`retry`] - [`RetryPolicy`] and how each attempt's outcome is classified
//! - [`client`] - [`ProductClient`], the retry loop behind [`ProductLookup`]
//! - [`error`] - [`LookupError`], where "not found" is kept apart from "unavailable"

pub mod client;
pub mod error;
pub mod retry;
pub mod transport;

pub use client::{ProductClient, ProductLookup};
pub use error::LookupError;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, ProductTransport, RawReply, TransportError};
