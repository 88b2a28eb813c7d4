// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Purchase and subscription transactions.
//!
//! Orchestrates the gated backend calls and broadcasts the success
//! signal every entitlement subscriber re-resolves on. There is no
//! client-side duplicate-purchase guard; the backend is the source of
//! truth, and the UI only hides the buy affordance once the access gate
//! already reports a grid unlocked.

use crate::events::{AppEvent, EventBus};
use crate::models::grid::GridId;
use crate::services::api::{ApiError, BackendClient, PlanType};
use crate::services::credential::CredentialStore;

/// Fallback dialog text when the backend rejects a purchase without a
/// message of its own.
const PURCHASE_REJECTED_FALLBACK: &str = "Failed to purchase grid";

/// Fallback dialog text for purchase transport failures.
const PURCHASE_TRANSPORT_FALLBACK: &str = "An error occurred while processing your purchase";

/// Fallback dialog text for subscription failures.
const SUBSCRIBE_FALLBACK: &str = "Failed to subscribe. Please try again.";

/// How a transaction attempt ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The backend accepted the transaction and the success signal was
    /// broadcast.
    Completed,
    /// No credential is stored; the caller should route to login. This
    /// is an outcome, not an error.
    LoginRequired,
}

/// A failed transaction, carrying the user-facing dialog message.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct PurchaseError {
    message: String,
    #[source]
    source: ApiError,
}

impl PurchaseError {
    /// Server-provided error text, or the generic fallback.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn new(source: ApiError, rejected_fallback: &str, transport_fallback: &str) -> Self {
        let message = match &source {
            ApiError::Rejected(_) => source
                .server_message()
                .unwrap_or(rejected_fallback)
                .to_string(),
            _ => transport_fallback.to_string(),
        };
        Self { message, source }
    }
}

/// Transaction flow shared by the grid detail and subscription views.
#[derive(Clone)]
pub struct PurchaseFlow {
    api: BackendClient,
    store: CredentialStore,
    bus: EventBus,
}

impl PurchaseFlow {
    pub fn new(api: BackendClient, store: CredentialStore, bus: EventBus) -> Self {
        Self { api, store, bus }
    }

    /// Purchase lifetime access to one grid. The id goes out in its
    /// normalized string form.
    pub async fn purchase_grid(&self, grid_id: &GridId) -> Result<PurchaseOutcome, PurchaseError> {
        let Some(credential) = self.store.credential() else {
            tracing::info!(grid_id = %grid_id, "Purchase attempted without credential");
            return Ok(PurchaseOutcome::LoginRequired);
        };

        match self.api.purchase_grid(&credential, grid_id).await {
            Ok(()) => {
                tracing::info!(grid_id = %grid_id, "Grid purchase completed");
                self.bus.emit(AppEvent::PurchaseUpdated);
                Ok(PurchaseOutcome::Completed)
            }
            Err(e) => Err(PurchaseError::new(
                e,
                PURCHASE_REJECTED_FALLBACK,
                PURCHASE_TRANSPORT_FALLBACK,
            )),
        }
    }

    /// Start a monthly or yearly subscription.
    pub async fn subscribe(&self, plan: PlanType) -> Result<PurchaseOutcome, PurchaseError> {
        let Some(credential) = self.store.credential() else {
            tracing::info!(?plan, "Subscribe attempted without credential");
            return Ok(PurchaseOutcome::LoginRequired);
        };

        match self.api.subscribe(&credential, plan).await {
            Ok(()) => {
                tracing::info!(?plan, "Subscription completed");
                self.bus.emit(AppEvent::PurchaseUpdated);
                Ok(PurchaseOutcome::Completed)
            }
            Err(e) => Err(PurchaseError::new(e, SUBSCRIBE_FALLBACK, SUBSCRIBE_FALLBACK)),
        }
    }
}
