//! Custom actions for the Cart actor.
//!
//! These are the mutations a [`Cart`](crate::model::Cart) accepts. Reads go through
//! the framework's `Get` request, and dropping a whole cart through `Remove`.

use crate::model::SkuId;

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds `count` units of `sku_id`, creating the line if needed.
    ///
    /// # Errors
    /// Fails if `count` is zero or the resulting quantity does not fit in a `u64`.
    AddItem { sku_id: SkuId, count: u64 },
    /// Removes the line for `sku_id`, if any.
    DeleteItem { sku_id: SkuId },
}

/// Results from CartActions - variants match 1:1 with CartAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartActionResult {
    /// The line's quantity after the addition.
    AddItem(u64),
    /// Whether a line was removed.
    DeleteItem(bool),
}
