// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local event broadcast.
//!
//! The auth and purchase flows announce state changes as zero-payload
//! signals; every subscriber independently re-resolves its entitlement
//! rather than receiving a targeted update.

use tokio::sync::broadcast;

/// Capacity of the broadcast channel. Signals are tiny and subscribers
/// coalesce them, so a small buffer is enough.
const CHANNEL_CAPACITY: usize = 16;

/// Application-wide signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The stored credential changed (login, logout, or expiry).
    AuthChanged,
    /// A purchase or subscription completed on the backend.
    PurchaseUpdated,
}

/// Broadcast bus shared by all components.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to all future signals.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Fire-and-forget broadcast. A send with no subscribers is not an
    /// error; nobody is listening yet.
    pub fn emit(&self, event: AppEvent) {
        let delivered = self.tx.send(event).unwrap_or(0);
        tracing::debug!(?event, delivered, "Event broadcast");
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
