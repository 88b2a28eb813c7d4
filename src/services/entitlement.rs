// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entitlement resolution and per-view watchers.
//!
//! `resolve` maps a credential to the user's access rights with a single
//! network round trip, normalizing every failure into the free/empty
//! default. `EntitlementWatcher` is the per-view subscriber: it holds the
//! latest resolution in a watch channel and re-resolves on every bus
//! signal, discarding superseded in-flight work (last-write-wins).

use crate::events::EventBus;
use crate::models::{AccessTier, Credential, Entitlement, GridId};
use crate::services::api::{AccessResponse, BackendClient};
use crate::services::credential::CredentialStore;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Wire value of the subscribed tier in the access payload.
const SUBSCRIPTION_ACCESS: &str = "subscription";

/// Shared entitlement cache keyed by credential, for use across watchers.
pub type EntitlementCache = Arc<DashMap<String, Entitlement>>;

/// Create a cache suitable for sharing across all resolvers in a process.
pub fn new_entitlement_cache() -> EntitlementCache {
    Arc::new(DashMap::new())
}

/// Resolves a credential to an [`Entitlement`].
#[derive(Clone)]
pub struct EntitlementResolver {
    api: BackendClient,
    cache: Option<EntitlementCache>,
}

impl EntitlementResolver {
    /// Uncached resolver: every call with a credential hits the network.
    pub fn new(api: BackendClient) -> Self {
        Self { api, cache: None }
    }

    /// Resolver backed by a process-wide cache. The cache must be
    /// invalidated on auth and purchase signals; [`EntitlementWatcher`]
    /// does this before each re-resolution.
    pub fn with_cache(api: BackendClient, cache: EntitlementCache) -> Self {
        Self {
            api,
            cache: Some(cache),
        }
    }

    /// Resolve access rights for the given credential.
    ///
    /// No credential means the free/empty default with zero network
    /// calls. Network failures, non-success statuses, and malformed
    /// payloads all degrade to the same default; browsing must keep
    /// working, so nothing here is an error to the caller.
    pub async fn resolve(&self, credential: Option<&Credential>) -> Entitlement {
        let Some(credential) = credential else {
            return Entitlement::free();
        };

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(credential.as_str()) {
                return hit.value().clone();
            }
        }

        match self.api.fetch_access(credential).await {
            Ok(response) => {
                let entitlement = entitlement_from_response(response);
                if let Some(cache) = &self.cache {
                    cache.insert(credential.as_str().to_string(), entitlement.clone());
                }
                entitlement
            }
            Err(e) => {
                tracing::warn!(error = %e, "Entitlement fetch failed, defaulting to free access");
                Entitlement::free()
            }
        }
    }

    /// Drop every cached entitlement. No-op without a cache.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

/// Map the access payload to an entitlement. The tier is the payload's
/// `access` string compared exactly against the subscription value;
/// purchased ids are normalized so later membership tests accept either
/// numeric or string forms.
fn entitlement_from_response(response: AccessResponse) -> Entitlement {
    let tier = if response.access == SUBSCRIPTION_ACCESS {
        AccessTier::Subscribed
    } else {
        AccessTier::Free
    };

    Entitlement {
        tier,
        purchased_grids: response
            .purchased_grids
            .iter()
            .map(GridId::new)
            .collect(),
    }
}

/// Per-view entitlement subscription.
///
/// Spawns a task that resolves once immediately and again after every
/// bus signal, publishing results through a watch channel. A signal that
/// arrives while a resolution is in flight aborts that resolution and
/// restarts with the current credential, so consumers only ever observe
/// the most recent outcome. Dropping the watcher aborts the task and any
/// in-flight request with it.
pub struct EntitlementWatcher {
    rx: watch::Receiver<Entitlement>,
    handle: JoinHandle<()>,
}

impl EntitlementWatcher {
    pub fn spawn(resolver: EntitlementResolver, store: CredentialStore, bus: &EventBus) -> Self {
        let (tx, rx) = watch::channel(Entitlement::free());
        let events = bus.subscribe();
        let handle = tokio::spawn(run_watcher(resolver, store, events, tx));
        Self { rx, handle }
    }

    /// The most recently published entitlement.
    pub fn current(&self) -> Entitlement {
        self.rx.borrow().clone()
    }

    /// A receiver that observes every published entitlement.
    pub fn subscribe(&self) -> watch::Receiver<Entitlement> {
        self.rx.clone()
    }
}

impl Drop for EntitlementWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_watcher(
    resolver: EntitlementResolver,
    store: CredentialStore,
    mut events: broadcast::Receiver<crate::events::AppEvent>,
    tx: watch::Sender<Entitlement>,
) {
    loop {
        let credential = store.credential();

        // Race the resolution against the next signal. A signal wins by
        // dropping the in-flight future; the stale response can never be
        // applied.
        let resolved = tokio::select! {
            entitlement = resolver.resolve(credential.as_ref()) => Some(entitlement),
            received = events.recv() => match received {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => None,
                Err(broadcast::error::RecvError::Closed) => return,
            },
        };

        match resolved {
            Some(entitlement) => {
                tx.send_replace(entitlement);
                match events.recv().await {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        resolver.invalidate();
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
            // Superseded mid-flight: invalidate and start over with the
            // credential as it is now.
            None => resolver.invalidate(),
        }
    }
}
