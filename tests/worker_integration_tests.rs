//! Integration Tests for the Offline Cache Subsystem
//!
//! Exercises the full path: bridge and pages on one side, the registered
//! worker on the other, coordinating only through the message channel and
//! fetch dispatch.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;

use oyiee_offline_cache::cache::{
    ASSET_CACHE_NAME, PROFILE_ASSETS, PROFILE_DATA_CACHE_NAME, PROFILE_DATA_KEY,
};
use oyiee_offline_cache::models::{
    AuthUser, Connectivity, FetchRequest, FetchResponse, ProfileSnapshot, WorkerMessage,
};
use oyiee_offline_cache::worker::FetchDecision;
use oyiee_offline_cache::{MemoryNetwork, MemoryProfileStore, SyncBridge, WorkerConfig, WorkerRegistry};

// == Helper Functions ==

fn setup() -> (WorkerRegistry, MemoryNetwork) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let network = MemoryNetwork::new();
    let registry = WorkerRegistry::new(WorkerConfig::default(), Arc::new(network.clone()));
    (registry, network)
}

fn route_shell_assets(network: &MemoryNetwork) {
    for asset in PROFILE_ASSETS {
        network.route(asset, FetchResponse::text(200, format!("asset:{asset}")));
    }
}

fn profile() -> ProfileSnapshot {
    ProfileSnapshot::new(json!({"uid": "u1", "displayName": "Ada"}))
}

fn sign_in() -> WorkerMessage {
    WorkerMessage::SetAuthStatus {
        is_authenticated: true,
        profile: Some(profile()),
    }
}

fn sign_out() -> WorkerMessage {
    WorkerMessage::SetAuthStatus {
        is_authenticated: false,
        profile: None,
    }
}

fn request(path: &str) -> FetchRequest {
    FetchRequest::parse(&format!("https://oyiee.app{path}")).unwrap()
}

async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Waits until the asset cache holds all four shell assets.
async fn wait_for_shell_population(registry: &WorkerRegistry) {
    let storage = registry.storage();
    assert!(
        eventually(|| {
            let storage = storage.clone();
            async move { storage.store_len(ASSET_CACHE_NAME).await == Some(PROFILE_ASSETS.len()) }
        })
        .await,
        "shell assets were not populated"
    );
}

fn intercepted(decision: FetchDecision) -> FetchResponse {
    match decision {
        FetchDecision::Intercepted(response) => response,
        FetchDecision::PassThrough => panic!("expected interception"),
    }
}

// == Activation Tests ==

#[tokio::test]
async fn test_sign_in_populates_all_shell_assets() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    let worker = registry.register();

    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    let storage = registry.storage();
    for asset in PROFILE_ASSETS {
        let key = format!("https://oyiee.app{asset}");
        let entry = storage.match_in(ASSET_CACHE_NAME, &key).await;
        assert!(entry.is_some(), "missing shell asset {asset}");
        assert!(entry.unwrap().response.is_success());
    }
}

#[tokio::test]
async fn test_repeated_sign_in_preserves_cached_profile_pages() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    network.route("/profile/u1", FetchResponse::html("<p>B</p>"));
    let worker = registry.register();

    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    // Cache a profile page, then deliver a fresh sign-in
    intercepted(registry.dispatch_fetch(request("/profile/u1")).await);
    worker.post_message(&sign_in());
    tokio::time::sleep(Duration::from_millis(50)).await;

    let storage = registry.storage();
    assert!(storage
        .match_in(ASSET_CACHE_NAME, "https://oyiee.app/profile/u1")
        .await
        .is_some());
}

// == Deactivation Tests ==

#[tokio::test]
async fn test_sign_out_deletes_both_stores() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    let worker = registry.register();

    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;
    worker.post_message(&WorkerMessage::UpdateProfileCache { profile: profile() });

    worker.post_message(&sign_out());

    let storage = registry.storage();
    assert!(
        eventually(|| {
            let storage = storage.clone();
            async move {
                !storage.has_store(ASSET_CACHE_NAME).await
                    && !storage.has_store(PROFILE_DATA_CACHE_NAME).await
            }
        })
        .await,
        "stores still present after sign-out"
    );
}

// == Profile Page Policy Tests ==

#[tokio::test]
async fn test_profile_page_network_then_offline_fallback() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    network.route("/profile/u1", FetchResponse::html("<p>B</p>"));
    let worker = registry.register();
    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    // Network reachable: live response returned and cached
    let live = intercepted(registry.dispatch_fetch(request("/profile/u1")).await);
    assert_eq!(live.body_text(), "<p>B</p>");
    let cached = registry
        .storage()
        .match_in(ASSET_CACHE_NAME, "https://oyiee.app/profile/u1")
        .await
        .unwrap();
    assert_eq!(cached.response, live);

    // Network gone: the previously cached body comes back unchanged
    network.set_offline(true);
    let fallback = intercepted(registry.dispatch_fetch(request("/profile/u1")).await);
    assert_eq!(fallback.body_text(), "<p>B</p>");
}

#[tokio::test]
async fn test_profile_page_offline_uncached_serves_offline_document() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    let worker = registry.register();
    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    network.set_offline(true);
    let response = intercepted(registry.dispatch_fetch(request("/profile/never-seen")).await);
    assert_eq!(response.content_type(), Some("text/html"));
    assert!(response.body_text().contains("You're Offline"));
}

// == Shell Asset Policy Tests ==

#[tokio::test]
async fn test_cached_shell_asset_never_touches_network() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    let worker = registry.register();
    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    let populated = network.fetch_count("/manifest.json");
    for _ in 0..3 {
        let response = intercepted(registry.dispatch_fetch(request("/manifest.json")).await);
        assert_eq!(response.body_text(), "asset:/manifest.json");
    }
    assert_eq!(network.fetch_count("/manifest.json"), populated);
}

#[tokio::test]
async fn test_shell_asset_survives_going_offline() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    let worker = registry.register();
    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    network.set_offline(true);
    let response = intercepted(registry.dispatch_fetch(request("/static/css/main.css")).await);
    assert_eq!(response.body_text(), "asset:/static/css/main.css");
}

// == Interception Gating Tests ==

#[tokio::test]
async fn test_inactive_worker_never_intercepts() {
    let (registry, network) = setup();
    network.route("/profile/u1", FetchResponse::html("<p>B</p>"));
    registry.register();

    let decision = registry.dispatch_fetch(request("/profile/u1")).await;
    assert_eq!(decision, FetchDecision::PassThrough);
}

#[tokio::test]
async fn test_cross_origin_request_passes_through() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    let worker = registry.register();
    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    let foreign = FetchRequest::parse("https://api.example.com/profile/u1").unwrap();
    assert_eq!(registry.dispatch_fetch(foreign).await, FetchDecision::PassThrough);
}

#[tokio::test]
async fn test_unknown_message_kind_leaves_worker_unchanged() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    network.route("/profile/u1", FetchResponse::html("<p>B</p>"));
    let worker = registry.register();
    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    worker.post_raw(json!({"type": "DROP_ALL_STATE"}));
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(matches!(
        registry.dispatch_fetch(request("/profile/u1")).await,
        FetchDecision::Intercepted(_)
    ));
    assert!(registry.storage().has_store(ASSET_CACHE_NAME).await);
}

// == Profile Data Tests ==

#[tokio::test]
async fn test_update_profile_cache_is_idempotent() {
    let (registry, _) = setup();
    let worker = registry.register();

    worker.post_message(&WorkerMessage::UpdateProfileCache { profile: profile() });
    worker.post_message(&WorkerMessage::UpdateProfileCache { profile: profile() });

    let storage = registry.storage();
    assert!(
        eventually(|| {
            let storage = storage.clone();
            async move { storage.store_len(PROFILE_DATA_CACHE_NAME).await == Some(1) }
        })
        .await
    );

    let entry = storage
        .match_in(PROFILE_DATA_CACHE_NAME, PROFILE_DATA_KEY)
        .await
        .unwrap();
    assert_eq!(entry.response.content_type(), Some("application/json"));
    let stored: ProfileSnapshot = serde_json::from_slice(&entry.response.body).unwrap();
    assert_eq!(stored, profile());
}

// == Worker Restart Tests ==

#[tokio::test]
async fn test_restart_resets_volatile_state_but_keeps_caches() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    network.route("/profile/u1", FetchResponse::html("<p>B</p>"));
    let worker = registry.register();
    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;
    intercepted(registry.dispatch_fetch(request("/profile/u1")).await);

    // A new worker takes over: volatile state is gone, caches are not
    let replacement = registry.register();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(
        registry.dispatch_fetch(request("/profile/u1")).await,
        FetchDecision::PassThrough
    );
    assert!(registry
        .storage()
        .match_in(ASSET_CACHE_NAME, "https://oyiee.app/profile/u1")
        .await
        .is_some());

    // Main context resends auth state and interception resumes
    replacement.post_message(&sign_in());
    assert!(
        eventually(|| {
            let registry = registry.clone();
            async move {
                matches!(
                    registry.dispatch_fetch(request("/profile/u1")).await,
                    FetchDecision::Intercepted(_)
                )
            }
        })
        .await
    );
}

// == Connectivity Tests ==

#[tokio::test]
async fn test_coming_back_online_repopulates_shell() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    let worker = registry.register();
    worker.post_message(&sign_in());
    wait_for_shell_population(&registry).await;

    // Sign out wipes the caches, sign in while offline cannot refill them
    worker.post_message(&sign_out());
    network.set_offline(true);
    worker.post_message(&sign_in());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_ne!(
        registry.storage().store_len(ASSET_CACHE_NAME).await,
        Some(PROFILE_ASSETS.len())
    );

    network.set_offline(false);
    worker.notify_connectivity(Connectivity::Online);
    wait_for_shell_population(&registry).await;
}

// == Bridge End-to-End Tests ==

#[tokio::test]
async fn test_bridge_sign_in_and_out_drive_worker() {
    let (registry, network) = setup();
    route_shell_assets(&network);
    network.route("/profile/u1", FetchResponse::html("<p>B</p>"));
    registry.register();

    let profiles = MemoryProfileStore::new();
    profiles.insert("u1", profile());
    let bridge = SyncBridge::new(registry.clone(), Arc::new(profiles));

    let (auth, signal) = watch::channel(None);
    bridge.spawn_observer(signal);

    auth.send(Some(AuthUser::new("u1"))).unwrap();
    assert!(
        eventually(|| {
            let registry = registry.clone();
            async move {
                matches!(
                    registry.dispatch_fetch(request("/profile/u1")).await,
                    FetchDecision::Intercepted(_)
                )
            }
        })
        .await,
        "sign-in never reached the worker"
    );

    auth.send(None).unwrap();
    let storage = registry.storage();
    assert!(
        eventually(|| {
            let storage = storage.clone();
            async move { !storage.has_store(ASSET_CACHE_NAME).await }
        })
        .await,
        "sign-out never cleared the caches"
    );
}

#[tokio::test]
async fn test_bridge_profile_lookup_failure_keeps_worker_inactive() {
    let (registry, network) = setup();
    network.route("/profile/u1", FetchResponse::html("<p>B</p>"));
    registry.register();

    let profiles = MemoryProfileStore::new();
    profiles.insert("u1", profile());
    profiles.set_failing(true);
    let bridge = SyncBridge::new(registry.clone(), Arc::new(profiles));

    let (auth, signal) = watch::channel(Some(AuthUser::new("u1")));
    bridge.spawn_observer(signal);

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(
        registry.dispatch_fetch(request("/profile/u1")).await,
        FetchDecision::PassThrough
    );
    drop(auth);
}

#[tokio::test]
async fn test_bridge_push_profile_round_trips() {
    let (registry, _) = setup();
    registry.register();
    let bridge = SyncBridge::new(registry.clone(), Arc::new(MemoryProfileStore::new()));

    bridge.push_profile(profile());

    let storage = registry.storage();
    assert!(
        eventually(|| {
            let storage = storage.clone();
            async move {
                match storage.match_in(PROFILE_DATA_CACHE_NAME, PROFILE_DATA_KEY).await {
                    Some(entry) => {
                        serde_json::from_slice::<ProfileSnapshot>(&entry.response.body)
                            .map(|stored| stored == profile())
                            .unwrap_or(false)
                    }
                    None => false,
                }
            }
        })
        .await
    );
}
