// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod api;
pub mod credential;
pub mod dataset;
pub mod entitlement;
pub mod purchase;

pub use account::{AccessApplication, AccountError, AccountService};
pub use api::{AccessResponse, ApiError, BackendClient, LoginMode, PlanType};
pub use credential::CredentialStore;
pub use dataset::{DatasetError, GridDataset};
pub use entitlement::{
    new_entitlement_cache, EntitlementCache, EntitlementResolver, EntitlementWatcher,
};
pub use purchase::{PurchaseError, PurchaseFlow, PurchaseOutcome};
