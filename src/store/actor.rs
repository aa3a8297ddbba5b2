use super::{CartStore, StoreError};
use crate::cart_actor::{self, CartAction};
use crate::framework::{FrameworkError, ShardedClient};
use crate::model::{Cart, CartLine, SkuId, UserId};
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Cart store backed by [`Cart`] entities living in shard actors.
#[derive(Debug, Clone)]
pub struct ActorCartStore {
    inner: ShardedClient<Cart>,
}

impl ActorCartStore {
    pub fn new(inner: ShardedClient<Cart>) -> Self {
        Self { inner }
    }

    /// Spawns `shard_count` cart actors and wraps them.
    ///
    /// The handles finish once every clone of the store is dropped.
    pub fn spawn(shard_count: usize) -> (Self, Vec<JoinHandle<()>>) {
        let (inner, handles) = cart_actor::spawn_shards(shard_count);
        (Self::new(inner), handles)
    }

    pub fn shard_count(&self) -> usize {
        self.inner.shard_count()
    }

    fn map_error(e: FrameworkError) -> StoreError {
        match e {
            FrameworkError::Entity(inner) => StoreError::Rejected(inner.to_string()),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl CartStore for ActorCartStore {
    #[instrument(skip(self))]
    async fn add_item(&self, user_id: UserId, sku_id: SkuId, count: u64) -> Result<(), StoreError> {
        let result = self
            .inner
            .perform_action(user_id, CartAction::AddItem { sku_id, count })
            .await
            .map_err(Self::map_error)?;
        debug!(?result, "Item added");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_item(&self, user_id: UserId, sku_id: SkuId) -> Result<(), StoreError> {
        let result = self
            .inner
            .perform_action(user_id, CartAction::DeleteItem { sku_id })
            .await
            .map_err(Self::map_error)?;
        debug!(?result, "Item deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self, user_id: UserId) -> Result<(), StoreError> {
        let existed = self.inner.remove(user_id).await.map_err(Self::map_error)?;
        debug!(existed, "Cart cleared");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError> {
        let cart = self.inner.get(user_id).await.map_err(Self::map_error)?;
        Ok(cart.map(|c| c.lines()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart_actor::CartActionResult;
    use crate::framework::mock::MockClient;

    fn mocked(mock: &MockClient<Cart>) -> ActorCartStore {
        let sharded = ShardedClient::from_clients(vec![mock.client()]).unwrap();
        ActorCartStore::new(sharded)
    }

    #[tokio::test]
    async fn test_upsert_then_list() {
        let (store, _handles) = ActorCartStore::spawn(4);
        let user = UserId(1);

        store.add_item(user, SkuId(1002), 1).await.unwrap();
        store.add_item(user, SkuId(1001), 2).await.unwrap();
        store.add_item(user, SkuId(1001), 1).await.unwrap();

        let lines = store.get_cart(user).await.unwrap();
        assert_eq!(lines, vec![CartLine::new(SkuId(1001), 3), CartLine::new(SkuId(1002), 1)]);
        assert!(store.get_cart(UserId(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_clear_are_idempotent() {
        let (store, _handles) = ActorCartStore::spawn(2);
        let user = UserId(5);

        store.delete_item(user, SkuId(1)).await.unwrap();
        store.clear_cart(user).await.unwrap();

        store.add_item(user, SkuId(1), 1).await.unwrap();
        store.add_item(user, SkuId(2), 1).await.unwrap();
        store.delete_item(user, SkuId(1)).await.unwrap();
        store.delete_item(user, SkuId(1)).await.unwrap();
        assert_eq!(store.get_cart(user).await.unwrap(), vec![CartLine::new(SkuId(2), 1)]);

        store.clear_cart(user).await.unwrap();
        store.clear_cart(user).await.unwrap();
        assert!(store.get_cart(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_count_is_rejected() {
        let (store, _handles) = ActorCartStore::spawn(1);
        let result = store.add_item(UserId(1), SkuId(1), 0).await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert!(store.get_cart(UserId(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_actor_failures_map_to_unavailable() {
        let mut mock = MockClient::<Cart>::new();
        mock.expect_get(UserId(3)).return_err(FrameworkError::ActorClosed);
        mock.expect_remove(UserId(3)).return_err(FrameworkError::ActorDropped);
        let store = mocked(&mock);

        let get = store.get_cart(UserId(3)).await;
        let clear = store.clear_cart(UserId(3)).await;

        assert_eq!(get, Err(StoreError::Unavailable("Actor closed".into())));
        assert_eq!(
            clear,
            Err(StoreError::Unavailable("Actor dropped response channel".into()))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_answers_are_passed_through() {
        let mut mock = MockClient::<Cart>::new();
        let mut cart = Cart::empty(UserId(4));
        cart.lines.insert(SkuId(20), 2);
        cart.lines.insert(SkuId(10), 1);
        mock.expect_get(UserId(4)).return_ok(Some(cart));
        mock.expect_action(UserId(4)).return_ok(CartActionResult::DeleteItem(false));
        let store = mocked(&mock);

        let lines = store.get_cart(UserId(4)).await.unwrap();
        assert_eq!(lines, vec![CartLine::new(SkuId(10), 1), CartLine::new(SkuId(20), 2)]);
        store.delete_item(UserId(4), SkuId(99)).await.unwrap();
        mock.verify();
    }
}
