//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden; shard actors log their own label instead.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: shard startup and shutdown, with the number of carts held
//! - **Cart Operations**: one span per orchestrator call, with user and SKU fields
//! - **Product Lookups**: each retry, each skipped line, each aborted read
//!
//! ## Usage Examples
//!
//! ```bash
//! # State changes only
//! RUST_LOG=info cart-orchestrator --user 1 show
//!
//! # Payloads, shard traffic and lookup replies
//! RUST_LOG=debug cart-orchestrator --user 1 add --sku 1001 --count 2
//!
//! # Only the retry loop
//! RUST_LOG=warn,cart_orchestrator::product=debug cart-orchestrator --user 1 show
//! ```
//!
//! A read whose second line has disappeared upstream looks like this at `info`:
//!
//! ```text
//! INFO Actor started actor="shard-3"
//! WARN get_cart: Product gone, skipping line user_id=UserId(1) sku_id=sku_1002
//! ```

/// Logs go to stderr so command output on stdout stays machine readable.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
