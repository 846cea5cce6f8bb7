//! Worker Cache Controller
//!
//! The worker-side policy engine: volatile auth state, message handling,
//! and per-request interception decisions. Profile pages are network-first
//! with a cached fallback (freshness over speed); shell assets are
//! cache-first with a network refill (speed over freshness). Swapping the
//! two strategies would either pin stale profile data indefinitely or
//! defeat offline shell loading, so the asymmetry is load-bearing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{
    CacheStorage, ASSET_CACHE_NAME, PROFILE_ASSETS, PROFILE_DATA_CACHE_NAME, PROFILE_DATA_KEY,
    PROFILE_ROUTE_PREFIX,
};
use crate::config::WorkerConfig;
use crate::models::{Connectivity, FetchRequest, FetchResponse, ProfileSnapshot, WorkerMessage};
use crate::net::Network;

/// Offline fallback document served for profile-page requests with no
/// network and no cache hit.
const OFFLINE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Offline - OYIEE</title>
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>
    body { font-family: system-ui; text-align: center; padding: 2rem; background: #000; color: #ffd700; }
    h1 { color: #ffd700; }
  </style>
</head>
<body>
  <h1>You're Offline</h1>
  <p>Your profile data is cached and will load when you return to the profile page.</p>
  <p>Please check your internet connection to access other features.</p>
</body>
</html>"#;

// == Auth State ==
/// The worker's volatile view of the page's auth/profile state.
///
/// Starts unauthenticated on every worker start and is mutated only by
/// inbound messages; the main context resends it after a restart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub profile: Option<ProfileSnapshot>,
}

impl AuthState {
    /// True when both fields are truthy; every caching and interception
    /// decision is gated on this.
    pub fn is_active(&self) -> bool {
        self.is_authenticated && self.profile.is_some()
    }
}

// == Fetch Decision ==
/// Outcome of presenting an outbound request to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchDecision {
    /// The controller answered the request itself.
    Intercepted(FetchResponse),
    /// Not intercepted; the page goes to the network unmodified.
    PassThrough,
}

// == Cache Controller ==
/// The worker-side cache policy engine.
///
/// Owned by a single worker task: message handling runs to completion
/// before the next event, so the state value itself is never raced. Only
/// the cache I/O a handler spawns can interleave with later events.
#[derive(Debug)]
pub struct CacheController {
    config: WorkerConfig,
    storage: CacheStorage,
    network: Arc<dyn Network>,
    state: AuthState,
}

impl CacheController {
    // == Constructor ==
    /// Creates a controller in the inactive state.
    pub fn new(config: WorkerConfig, storage: CacheStorage, network: Arc<dyn Network>) -> Self {
        Self {
            config,
            storage,
            network,
            state: AuthState::default(),
        }
    }

    /// Returns whether the controller currently intercepts and caches.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    // == Message Handling ==
    /// Handles a raw JSON message from the page. Unrecognized kinds are
    /// ignored.
    pub async fn handle_raw(&mut self, value: serde_json::Value) {
        match serde_json::from_value::<WorkerMessage>(value) {
            Ok(message) => self.handle_message(message).await,
            Err(error) => debug!("ignoring unrecognized message: {error}"),
        }
    }

    /// Handles a decoded message from the page.
    pub async fn handle_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::SetAuthStatus {
                is_authenticated,
                profile,
            } => {
                self.state = AuthState {
                    is_authenticated,
                    profile,
                };

                if self.state.is_active() {
                    // Fire-and-forget: a later message may interleave with
                    // this population, last writer wins per cache key.
                    self.spawn_asset_population();
                } else {
                    self.clear_stores().await;
                }
            }
            WorkerMessage::UpdateProfileCache { profile } => {
                self.update_profile_cache(&profile).await;
            }
        }
    }

    /// Handles an online/offline transition from the hosting context.
    pub async fn handle_connectivity(&mut self, connectivity: Connectivity) {
        match connectivity {
            Connectivity::Online => {
                info!("back online");
                if self.state.is_active() {
                    self.spawn_asset_population();
                }
            }
            Connectivity::Offline => info!("gone offline"),
        }
    }

    // == Fetch Interception ==
    /// Decides whether and how to answer an outbound request from a
    /// controlled page.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> FetchDecision {
        // Only same-origin requests
        if request.url.origin() != self.config.origin.origin() {
            return FetchDecision::PassThrough;
        }

        if !self.state.is_active() {
            return FetchDecision::PassThrough;
        }

        let path = request.path();
        if path.starts_with(PROFILE_ROUTE_PREFIX) {
            return FetchDecision::Intercepted(self.network_first(request).await);
        }

        if PROFILE_ASSETS.iter().any(|asset| path.contains(asset)) {
            return FetchDecision::Intercepted(self.cache_first(request).await);
        }

        FetchDecision::PassThrough
    }

    /// Network-first-with-fallback, for profile pages.
    async fn network_first(&self, request: &FetchRequest) -> FetchResponse {
        let key = request.cache_key();

        match self.network.fetch(request).await {
            Ok(response) if response.is_success() => {
                if let Err(error) = self
                    .storage
                    .put(ASSET_CACHE_NAME, key, response.clone())
                    .await
                {
                    warn!("failed to cache profile response: {error}");
                }
                return response;
            }
            Ok(response) => debug!("network returned {} for {key}, trying cache", response.status),
            Err(error) => debug!("network failed for {key} ({error}), trying cache"),
        }

        if let Some(entry) = self.storage.match_any(&key).await {
            info!("serving cached profile page for {key} (stored {})", entry.age_display());
            return entry.response;
        }

        FetchResponse::html(OFFLINE_PAGE)
    }

    /// Cache-first-with-refill, for shell assets.
    async fn cache_first(&self, request: &FetchRequest) -> FetchResponse {
        let key = request.cache_key();

        if let Some(entry) = self.storage.match_any(&key).await {
            return entry.response;
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    if let Err(error) = self
                        .storage
                        .put(ASSET_CACHE_NAME, key, response.clone())
                        .await
                    {
                        warn!("failed to cache shell asset: {error}");
                    }
                }
                response
            }
            Err(error) => {
                debug!("network failed for {key} ({error}), trying cache");
                match self.storage.match_any(&key).await {
                    Some(entry) => entry.response,
                    None => FetchResponse::text(503, "Offline"),
                }
            }
        }
    }

    // == Cache Lifecycle ==
    /// Spawns shell-asset population off the message loop.
    fn spawn_asset_population(&self) {
        let storage = self.storage.clone();
        let network = Arc::clone(&self.network);
        let origin = self.config.origin.clone();
        tokio::spawn(async move {
            populate_shell_assets(storage, network, origin).await;
        });
    }

    /// Overwrites the single profile-data entry with the given snapshot.
    async fn update_profile_cache(&self, profile: &ProfileSnapshot) {
        match self.store_profile_data(profile).await {
            Ok(()) => info!("profile data cached"),
            Err(error) => warn!("failed to update profile cache: {error}"),
        }
    }

    async fn store_profile_data(&self, profile: &ProfileSnapshot) -> crate::error::Result<()> {
        let response = FetchResponse::json(profile)?;
        self.storage
            .put(PROFILE_DATA_CACHE_NAME, PROFILE_DATA_KEY.to_string(), response)
            .await
    }

    /// Deletes both named stores; a no-op when they are already absent.
    async fn clear_stores(&self) {
        self.storage.delete(ASSET_CACHE_NAME).await;
        self.storage.delete(PROFILE_DATA_CACHE_NAME).await;
        info!("all caches cleared");
    }
}

/// Populates the shell asset cache: fetch every fixed asset, then store
/// them all. All-or-nothing on the fetch side, so a single unreachable
/// asset stores nothing; the store itself is opened up front and stays
/// present even when population fails.
pub(crate) async fn populate_shell_assets(
    storage: CacheStorage,
    network: Arc<dyn Network>,
    origin: url::Url,
) {
    storage.open(ASSET_CACHE_NAME).await;

    let mut fetched = Vec::with_capacity(PROFILE_ASSETS.len());
    for asset in PROFILE_ASSETS {
        let url = match origin.join(asset) {
            Ok(url) => url,
            Err(error) => {
                warn!("failed to cache profile assets: bad asset url {asset}: {error}");
                return;
            }
        };
        let request = FetchRequest::new(url);

        match network.fetch(&request).await {
            Ok(response) if response.is_success() => fetched.push((request.cache_key(), response)),
            Ok(response) => {
                warn!("failed to cache profile assets: {asset} returned {}", response.status);
                return;
            }
            Err(error) => {
                warn!("failed to cache profile assets: {error}");
                return;
            }
        }
    }

    for (key, response) in fetched {
        if let Err(error) = storage.put(ASSET_CACHE_NAME, key, response).await {
            warn!("failed to cache profile assets: {error}");
            return;
        }
    }
    info!("profile assets cached");
}
