use crate::context::RequestContext;
use crate::error::CartError;
use crate::model::{CartItem, CartLine, CartView, SkuId, UserId};
use crate::product::ProductLookup;
use crate::store::CartStore;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Concurrent product lookups per `get_cart` when none is configured.
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 4;

/// The cart orchestrator.
///
/// Holds no per-request state; clones share the same store and lookup client.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn CartStore>,
    lookup: Arc<dyn ProductLookup>,
    lookup_concurrency: usize,
}

impl std::fmt::Debug for CartService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartService")
            .field("lookup_concurrency", &self.lookup_concurrency)
            .finish_non_exhaustive()
    }
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>, lookup: Arc<dyn ProductLookup>) -> Self {
        Self {
            store,
            lookup,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    /// Sets how many product lookups a single `get_cart` may have in flight (at least one).
    pub fn with_lookup_concurrency(mut self, lookup_concurrency: usize) -> Self {
        self.lookup_concurrency = lookup_concurrency.max(1);
        self
    }

    pub fn lookup_concurrency(&self) -> usize {
        self.lookup_concurrency
    }

    /// Adds `count` units of `sku_id` once the product service confirms the SKU exists.
    ///
    /// Nothing is written when the lookup fails. The check is point-in-time: a product
    /// removed right after it passes still lands in the cart, and is skipped on read.
    #[instrument(skip(self, ctx))]
    pub async fn add_to_cart(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        sku_id: SkuId,
        count: u64,
    ) -> Result<(), CartError> {
        let product = self
            .lookup
            .get_product(ctx, sku_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "Product check failed");
                CartError::from(e)
            })?;
        debug!(?product, "Product confirmed");

        ctx.run(self.store.add_item(user_id, sku_id, count)).await??;
        info!("Item added to cart");
        Ok(())
    }

    /// Removes one line. A missing line is not an error; a failing store is.
    #[instrument(skip(self, ctx))]
    pub async fn delete_item(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        sku_id: SkuId,
    ) -> Result<(), CartError> {
        ctx.run(self.store.delete_item(user_id, sku_id))
            .await?
            .map_err(|e| {
                warn!(error = %e, "Delete failed");
                CartError::from(e)
            })?;
        info!("Item deleted");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    pub async fn clear_cart(&self, ctx: &RequestContext, user_id: UserId) -> Result<(), CartError> {
        ctx.run(self.store.clear_cart(user_id))
            .await?
            .map_err(|e| {
                warn!(error = %e, "Clear failed");
                CartError::from(e)
            })?;
        info!("Cart cleared");
        Ok(())
    }

    /// Builds the priced view of the user's cart.
    ///
    /// Lines whose SKU the product service no longer knows are left out. Any other
    /// lookup failure fails the whole call; no partial view is returned.
    #[instrument(skip(self, ctx))]
    pub async fn get_cart(&self, ctx: &RequestContext, user_id: UserId) -> Result<CartView, CartError> {
        let lines = ctx.run(self.store.get_cart(user_id)).await??;
        debug!(lines = lines.len(), "Cart loaded");

        let resolved: Vec<Option<CartItem>> = stream::iter(lines)
            .map(|line| self.resolve_line(ctx, line))
            .buffered(self.lookup_concurrency)
            .try_collect()
            .await?;

        let items: Vec<CartItem> = resolved.into_iter().flatten().collect();
        let total_price = total_of(&items)?;
        debug!(items = items.len(), total_price, "Cart priced");

        Ok(CartView { items, total_price })
    }

    async fn resolve_line(&self, ctx: &RequestContext, line: CartLine) -> Result<Option<CartItem>, CartError> {
        match self.lookup.get_product(ctx, line.sku_id).await {
            Ok(product) => Ok(Some(CartItem {
                sku_id: line.sku_id,
                name: product.name,
                quantity: line.quantity,
                price: product.price,
            })),
            Err(e) if e.is_not_found() => {
                warn!(sku_id = %line.sku_id, "Product gone, skipping line");
                Ok(None)
            }
            Err(e) => {
                warn!(sku_id = %line.sku_id, error = %e, "Lookup failed, aborting read");
                Err(e.into())
            }
        }
    }
}

/// Σ price × quantity, failing on overflow.
fn total_of(items: &[CartItem]) -> Result<u64, CartError> {
    items.iter().try_fold(0u64, |total, item| {
        item.price
            .checked_mul(item.quantity)
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or(CartError::PriceOverflow(item.sku_id))
    })
}
