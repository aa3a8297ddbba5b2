use crate::config::CartConfig;
use crate::context::RequestContext;
use crate::product::{ProductClient, ProductLookup, TransportError};
use crate::service::CartService;
use crate::store::{ActorCartStore, CartStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("Product client setup failed: {0}")]
    ProductClient(#[from] TransportError),

    #[error("Store setup failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShutdownError {
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}

/// The runtime orchestrator for the cart service.
///
/// `CartSystem` is responsible for:
/// - **Lifecycle Management**: starting the store's shard actors and stopping them again
/// - **Dependency Wiring**: handing the store and the product client to [`CartService`]
/// - **Request Defaults**: the deadline every [`RequestContext`] it creates carries,
///   and a shared token that cancels all of them at once
///
/// # Example
///
/// ```ignore
/// let system = CartSystem::from_config(&CartConfig::from_env()?).await?;
///
/// let ctx = system.request_context();
/// system.service.add_to_cart(&ctx, UserId(1), SkuId(1001), 2).await?;
///
/// system.shutdown().await?;
/// ```
pub struct CartSystem {
    /// The orchestrator. Clones handed out must be dropped before [`CartSystem::shutdown`].
    pub service: CartService,

    request_timeout: Option<Duration>,

    /// Parent of every request context handed out
    shutdown: CancellationToken,

    /// Shard actor tasks (empty when the store is not actor-backed)
    handles: Vec<JoinHandle<()>>,
}

impl CartSystem {
    /// Spawns `shards` cart actors and wires them with `lookup`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(lookup: Arc<dyn ProductLookup>, shards: usize, lookup_concurrency: usize) -> Self {
        let (store, handles) = ActorCartStore::spawn(shards);
        info!(shards = store.shard_count(), "Cart store started");
        let service = CartService::new(Arc::new(store), lookup).with_lookup_concurrency(lookup_concurrency);

        Self {
            service,
            request_timeout: None,
            shutdown: CancellationToken::new(),
            handles,
        }
    }

    /// Wires an externally managed store; there are no actor tasks to stop.
    pub fn with_store(
        store: Arc<dyn CartStore>,
        lookup: Arc<dyn ProductLookup>,
        lookup_concurrency: usize,
    ) -> Self {
        Self {
            service: CartService::new(store, lookup).with_lookup_concurrency(lookup_concurrency),
            request_timeout: None,
            shutdown: CancellationToken::new(),
            handles: Vec::new(),
        }
    }

    /// Builds the HTTP product client and the store described by `config`.
    ///
    /// With the `postgres` feature and `DATABASE_URL` set, carts live in PostgreSQL;
    /// otherwise they live in shard actors.
    pub async fn from_config(config: &CartConfig) -> Result<Self, StartupError> {
        let lookup = ProductClient::http(
            &config.product_url,
            config.product_token.clone(),
            config.product_timeout,
            config.retry,
        )?;
        let lookup: Arc<dyn ProductLookup> = Arc::new(lookup);

        let system = match config.database_url.as_deref() {
            #[cfg(feature = "postgres")]
            Some(url) => {
                let store = crate::store::PgCartStore::connect(url).await?;
                store.migrate().await?;
                info!("Cart store connected to PostgreSQL");
                Self::with_store(Arc::new(store), lookup, config.lookup_concurrency)
            }
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                tracing::warn!("DATABASE_URL is set but the postgres feature is disabled; carts stay in memory");
                Self::new(lookup, config.shards, config.lookup_concurrency)
            }
            None => Self::new(lookup, config.shards, config.lookup_concurrency),
        };

        Ok(system.with_request_timeout(config.request_timeout))
    }

    pub fn with_request_timeout(mut self, request_timeout: Option<Duration>) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// A fresh context carrying the configured request deadline, if any.
    ///
    /// It is cancelled together with every other context from this system by
    /// [`CartSystem::cancel_requests`] or [`CartSystem::shutdown`].
    pub fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::with_token(self.shutdown.child_token());
        match self.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    /// The token behind [`CartSystem::cancel_requests`], e.g. for a signal handler.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Interrupts every in-flight request; contexts created afterwards start cancelled.
    pub fn cancel_requests(&self) {
        self.shutdown.cancel();
    }

    /// Cancels outstanding requests, then stops the shard actors and waits for them.
    ///
    /// Dropping the service closes the shard channels once no other clone of it is
    /// alive; each actor then leaves its loop.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        info!("Shutting down cart system...");
        self.shutdown.cancel();
        drop(self.service);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(ShutdownError::TaskFailed(e.to_string()));
            }
        }

        info!("Cart system shutdown complete.");
        Ok(())
    }
}
