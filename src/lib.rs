// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OSDATUM client core: tidal datum grid access for the Java Sea
//! working areas.
//!
//! This crate owns the state that spans the map, grid browser, and
//! profile views: the stored credential, the user's resolved
//! entitlement, the grid dataset with its point lookup, and the access
//! gate deciding which grids a user may see. Views are modeled as
//! entitlement watchers driven by a process-local event bus.

pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod models;
pub mod services;

use config::Config;
use events::EventBus;
use services::{
    new_entitlement_cache, AccountService, BackendClient, CredentialStore, EntitlementResolver,
    PurchaseFlow,
};

/// Shared application state.
///
/// Wires one of everything: the bus, the credential store, the backend
/// client, a cache-backed resolver, and the transaction flows. The grid
/// dataset is deliberately absent; each view loads its own copy.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub bus: EventBus,
    pub store: CredentialStore,
    pub api: BackendClient,
    pub resolver: EntitlementResolver,
    pub purchases: PurchaseFlow,
    pub account: AccountService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let bus = EventBus::new();
        let store = match &config.session_file {
            Some(path) => CredentialStore::with_persistence(bus.clone(), path),
            None => CredentialStore::new(bus.clone()),
        };
        let api = BackendClient::new(config.api_base_url.clone());
        let resolver = EntitlementResolver::with_cache(api.clone(), new_entitlement_cache());
        let purchases = PurchaseFlow::new(api.clone(), store.clone(), bus.clone());
        let account = AccountService::new(api.clone(), store.clone());

        Self {
            config,
            bus,
            store,
            api,
            resolver,
            purchases,
            account,
        }
    }
}
