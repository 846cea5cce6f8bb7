//! Sync Bridge
//!
//! Main-context side of the subsystem: observes the page's live auth
//! signal, resolves the signed-in user's profile from the external
//! profile store, and forwards both to the controlling worker. Every
//! observed change (including the first observation) produces exactly one
//! best-effort send; there is no retry or backoff, and with no controlling
//! worker the send is silently skipped.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::{AuthUser, ProfileSnapshot, WorkerMessage};
use crate::worker::WorkerRegistry;

// == Profile Store Trait ==
/// The external profile store contract: resolve a profile by user id.
///
/// Transient failures surface as a generic error; the bridge treats them
/// as "no profile".
#[async_trait]
pub trait ProfileStore: Send + Sync + fmt::Debug {
    async fn get_profile(&self, uid: &str) -> anyhow::Result<Option<ProfileSnapshot>>;
}

// == Memory Profile Store ==
/// In-memory [`ProfileStore`] with failure injection, for tests and
/// offline embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    inner: Arc<RwLock<MemoryProfileStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryProfileStoreInner {
    profiles: HashMap<String, ProfileSnapshot>,
    failing: bool,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a profile under the given user id.
    pub fn insert(&self, uid: impl Into<String>, profile: ProfileSnapshot) {
        let mut inner = self.inner.write().expect("profile store lock poisoned");
        inner.profiles.insert(uid.into(), profile);
    }

    /// Makes every lookup fail with a generic error until cleared.
    pub fn set_failing(&self, failing: bool) {
        let mut inner = self.inner.write().expect("profile store lock poisoned");
        inner.failing = failing;
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, uid: &str) -> anyhow::Result<Option<ProfileSnapshot>> {
        let inner = self.inner.read().expect("profile store lock poisoned");
        if inner.failing {
            anyhow::bail!("profile store unavailable");
        }
        Ok(inner.profiles.get(uid).cloned())
    }
}

// == Sync Bridge ==
/// Forwards auth/profile state from the main context to the worker.
#[derive(Debug, Clone)]
pub struct SyncBridge {
    registry: WorkerRegistry,
    profiles: Arc<dyn ProfileStore>,
}

impl SyncBridge {
    // == Constructor ==
    pub fn new(registry: WorkerRegistry, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { registry, profiles }
    }

    // == Observer ==
    /// Spawns the observer loop over the auth signal. The current value is
    /// forwarded immediately, then once per observed change, until the
    /// signal's sender is dropped.
    pub fn spawn_observer(&self, mut auth: watch::Receiver<Option<AuthUser>>) -> JoinHandle<()> {
        let bridge = self.clone();
        tokio::spawn(async move {
            loop {
                let user = auth.borrow_and_update().clone();
                bridge.forward_auth(user.as_ref()).await;
                if auth.changed().await.is_err() {
                    break;
                }
            }
            debug!("auth signal closed, sync bridge stopping");
        })
    }

    /// Resolves the user's profile and sends one `SET_AUTH_STATUS`.
    ///
    /// A failed lookup is logged and forwarded as an absent profile, so
    /// the worker falls back to the inactive state instead of caching
    /// against stale data.
    async fn forward_auth(&self, user: Option<&AuthUser>) {
        let Some(handle) = self.registry.controller() else {
            debug!("no controlling worker, skipping auth sync");
            return;
        };

        let mut profile = None;
        if let Some(user) = user {
            match self.profiles.get_profile(&user.uid).await {
                Ok(found) => profile = found,
                Err(error) => warn!("failed to get user profile for {}: {error:#}", user.uid),
            }
        }

        handle.post_message(&WorkerMessage::SetAuthStatus {
            is_authenticated: user.is_some(),
            profile,
        });
    }

    // == Profile Push ==
    /// Pushes an updated profile to the worker's profile-data cache.
    ///
    /// Fire-and-forget: callers must not assume the cache has been updated
    /// by the time this returns.
    pub fn push_profile(&self, profile: ProfileSnapshot) {
        let Some(handle) = self.registry.controller() else {
            debug!("no controlling worker, profile push skipped");
            return;
        };
        handle.post_message(&WorkerMessage::UpdateProfileCache { profile });
    }
}
