//! # Core Actor Framework
//!
//! This module defines the generic building blocks for the actor system.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that all keyed resources must implement.
//! - [`ResourceActor`]: The generic actor that owns entities.
//! - [`ResourceClient`]: The generic client for communicating with actors.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, Entity).

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any keyed resource must implement to be managed by a [`ResourceActor`].
///
/// # Architecture Note
/// Entities are addressed by a caller-chosen key rather than an actor-generated id.
/// The first [`ResourceRequest::Action`] for an unknown key materializes the entity
/// through [`ActorEntity::new`], so "insert or update" is a single message and
/// therefore a single, uninterruptible step inside the owning actor.
///
/// After every action the actor asks [`ActorEntity::is_vacant`]; a vacant entity is
/// dropped from the map so empty resources never linger.
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// The key this entity is addressed by (e.g., a user id).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Enum representing resource-specific operations.
    type Action: Send + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Debug;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct an empty entity for `id`.
    fn new(id: Self::Id) -> Self;

    /// Apply a resource-specific action.
    ///
    /// When this returns an error the entity must be left as it was.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;

    /// Whether the entity holds nothing worth keeping.
    fn is_vacant(&self) -> bool {
        false
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Entity error: {0}")]
    Entity(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message type sent to an actor.
///
/// - **Get**: returns a snapshot of the entity, if any.
/// - **Action**: creates the entity on demand, applies the action, evicts it if vacant.
/// - **Remove**: drops the entity; answers whether one existed.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Remove {
        id: T::Id,
        respond_to: Response<bool>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// The generic actor that owns a collection of keyed entities.
///
/// **Concurrency Model**:
/// Each actor processes its own messages *sequentially*. Two actions on the same key
/// can never interleave, so read-modify-write sequences such as "increment a
/// quantity" need no `Mutex`. Independent actors run in parallel.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    label: String,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::with_label(buffer_size, entity_type::<T>())
    }

    /// Same as [`ResourceActor::new`], with a custom label for log lines.
    pub fn with_label(buffer_size: usize, label: impl Into<String>) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            label: label.into(),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self) {
        let actor = self.label.as_str();
        info!(actor, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(actor, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(actor, %id, ?action, "Action");
                    let item = self
                        .store
                        .entry(id.clone())
                        .or_insert_with(|| T::new(id.clone()));
                    let result = item
                        .handle_action(action)
                        .map_err(|e| FrameworkError::Entity(Box::new(e)));
                    let vacant = item.is_vacant();
                    if vacant {
                        self.store.remove(&id);
                    }
                    match &result {
                        Ok(_) => debug!(actor, %id, vacant, size = self.store.len(), "Action ok"),
                        Err(e) => warn!(actor, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Remove { id, respond_to } => {
                    let existed = self.store.remove(&id).is_some();
                    debug!(actor, %id, existed, size = self.store.len(), "Remove");
                    let _ = respond_to.send(Ok(existed));
                }
            }
        }

        info!(actor, size = self.store.len(), "Shutdown");
    }
}

/// Short type name of `T` (e.g. "Cart" instead of "cart_orchestrator::model::cart::Cart").
fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only a channel sender, so cloning is cheap and clones can be shared across tasks.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("entity", &entity_type::<T>())
            .finish()
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Action {
                id,
                action,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn remove(&self, id: T::Id) -> Result<bool, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Remove { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
