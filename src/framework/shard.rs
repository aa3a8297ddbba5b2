//! # Sharded Actors
//!
//! A single actor serializes every request it receives. That is exactly what we
//! want for one key, and exactly what we do not want across unrelated keys.
//! [`ShardedClient`] spreads keys over several [`ResourceActor`]s: a key always
//! lands on the same shard, so per-key ordering holds, while keys on different
//! shards proceed in parallel.

use crate::framework::{ActorEntity, FrameworkError, ResourceActor, ResourceClient};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tokio::task::JoinHandle;
use tracing::info;

/// Routes each key to one of a fixed set of actors.
#[derive(Debug)]
pub struct ShardedClient<T: ActorEntity> {
    shards: Vec<ResourceClient<T>>,
}

impl<T: ActorEntity> Clone for ShardedClient<T> {
    fn clone(&self) -> Self {
        Self {
            shards: self.shards.clone(),
        }
    }
}

impl<T: ActorEntity> ShardedClient<T> {
    /// Spawns `shard_count` actors (at least one) and returns the routing client
    /// together with the actor task handles.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(shard_count: usize, buffer_size: usize) -> (Self, Vec<JoinHandle<()>>) {
        let shard_count = shard_count.max(1);
        let mut shards = Vec::with_capacity(shard_count);
        let mut handles = Vec::with_capacity(shard_count);

        for index in 0..shard_count {
            let (actor, client) = ResourceActor::<T>::with_label(buffer_size, format!("shard-{index}"));
            handles.push(tokio::spawn(actor.run()));
            shards.push(client);
        }

        info!(shards = shard_count, "Shards spawned");
        (Self { shards }, handles)
    }

    /// Builds a router over already-running clients.
    ///
    /// Returns `None` when `shards` is empty.
    pub fn from_clients(shards: Vec<ResourceClient<T>>) -> Option<Self> {
        if shards.is_empty() {
            None
        } else {
            Some(Self { shards })
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Index of the shard owning `id`. Stable for the lifetime of the process.
    pub fn shard_index(&self, id: &T::Id) -> usize {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    /// The client for the shard owning `id`.
    pub fn route(&self, id: &T::Id) -> &ResourceClient<T> {
        &self.shards[self.shard_index(id)]
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.route(&id).get(id).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.route(&id).perform_action(id, action).await
    }

    pub async fn remove(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.route(&id).remove(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Slot {
        id: u64,
    }

    #[derive(Debug)]
    enum SlotAction {
        Touch,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("never")]
    struct SlotError;

    impl ActorEntity for Slot {
        type Id = u64;
        type Action = SlotAction;
        type ActionResult = u64;
        type Error = SlotError;

        fn new(id: u64) -> Self {
            Self { id }
        }

        fn handle_action(&mut self, _action: SlotAction) -> Result<u64, SlotError> {
            Ok(self.id)
        }
    }

    #[tokio::test]
    async fn test_routing_is_stable_and_in_range() {
        let (client, handles) = ShardedClient::<Slot>::spawn(4, 8);
        assert_eq!(client.shard_count(), 4);
        assert_eq!(handles.len(), 4);

        for id in 0..100u64 {
            let index = client.shard_index(&id);
            assert!(index < 4);
            assert_eq!(index, client.shard_index(&id));
        }

        assert_eq!(client.perform_action(42, SlotAction::Touch).await.unwrap(), 42);
        assert!(client.get(42).await.unwrap().is_some());
        assert!(client.remove(42).await.unwrap());

        drop(client);
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_zero_shards_means_one() {
        let (client, handles) = ShardedClient::<Slot>::spawn(0, 8);
        assert_eq!(client.shard_count(), 1);
        assert_eq!(handles.len(), 1);
    }

    #[test]
    fn test_from_clients_rejects_empty() {
        assert!(ShardedClient::<Slot>::from_clients(Vec::new()).is_none());
    }
}
