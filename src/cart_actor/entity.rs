//! ActorEntity trait implementation for the Cart domain type.
//!
//! A cart is created by the first `AddItem` for its user and evicted by the actor as
//! soon as its last line is deleted, so an empty cart and a missing cart look the same.

use super::actions::{CartAction, CartActionResult};
use super::error::CartEntityError;
use crate::framework::ActorEntity;
use crate::model::{Cart, UserId};

impl ActorEntity for Cart {
    type Id = UserId;
    type Action = CartAction;
    type ActionResult = CartActionResult;
    type Error = CartEntityError;

    fn new(id: UserId) -> Self {
        Cart::empty(id)
    }

    /// # Actions
    /// - `AddItem`: upsert; `quantity += count`, or insert with `count`
    /// - `DeleteItem`: remove the line if present
    fn handle_action(&mut self, action: CartAction) -> Result<CartActionResult, CartEntityError> {
        match action {
            CartAction::AddItem { sku_id, count } => {
                if count == 0 {
                    return Err(CartEntityError::ZeroQuantity(sku_id));
                }
                let current = self.lines.get(&sku_id).copied().unwrap_or(0);
                let quantity = current
                    .checked_add(count)
                    .ok_or(CartEntityError::QuantityOverflow {
                        sku_id,
                        current,
                        added: count,
                    })?;
                self.lines.insert(sku_id, quantity);
                Ok(CartActionResult::AddItem(quantity))
            }
            CartAction::DeleteItem { sku_id } => {
                Ok(CartActionResult::DeleteItem(self.lines.remove(&sku_id).is_some()))
            }
        }
    }

    fn is_vacant(&self) -> bool {
        self.is_empty()
    }
}
