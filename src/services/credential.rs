// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store and expiry monitoring.
//!
//! Single owner of the persisted bearer credential. Every other component
//! reads a copy per operation; mutation happens only here, and every
//! mutation is announced on the event bus.

use crate::events::{AppEvent, EventBus};
use crate::models::{Credential, Session, UserProfile};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owner of the current session (credential + cached profile).
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<Session>>>,
    path: Arc<Option<PathBuf>>,
    bus: EventBus,
}

impl CredentialStore {
    /// In-memory store with no persistence.
    pub fn new(bus: EventBus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            path: Arc::new(None),
            bus,
        }
    }

    /// Store backed by a JSON session file, loading any existing session.
    /// An unreadable or malformed file is discarded, not an error.
    pub fn with_persistence(bus: EventBus, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<Session>(&json) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Discarding malformed session file");
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            inner: Arc::new(RwLock::new(session)),
            path: Arc::new(Some(path)),
            bus,
        }
    }

    /// Copy of the current credential, if any.
    pub fn credential(&self) -> Option<Credential> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.credential.clone()))
    }

    /// Copy of the cached profile, if any.
    pub fn profile(&self) -> Option<UserProfile> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().and_then(|s| s.profile.clone()))
    }

    /// Replace the session wholesale, persist it, and announce the change.
    pub fn set_session(&self, credential: Credential, profile: Option<UserProfile>) {
        let session = Session {
            credential,
            profile,
        };
        self.persist(Some(&session));
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(session);
        }
        self.bus.emit(AppEvent::AuthChanged);
    }

    /// Remove credential and cached profile. Idempotent: announces the
    /// change only when there was a session to clear, so racing callers
    /// (the expiry monitor vs. an explicit logout) produce one signal.
    pub fn clear(&self) -> bool {
        let removed = self
            .inner
            .write()
            .map(|mut guard| guard.take().is_some())
            .unwrap_or(false);

        if removed {
            self.persist(None);
            self.bus.emit(AppEvent::AuthChanged);
        }
        removed
    }

    /// Clear the session if the stored credential has expired. No-op when
    /// there is no session or the credential is still live.
    pub fn expire_if_due(&self) -> bool {
        match self.credential() {
            Some(credential) if credential.is_expired() => {
                tracing::warn!("Stored credential expired, clearing session");
                self.clear()
            }
            _ => false,
        }
    }

    /// Background expiry monitor: a one-shot timer armed at the expiry
    /// instant of the credential present at spawn time, plus a periodic
    /// liveness check that re-validates whatever credential is current.
    /// Safe to run alongside explicit `clear()` calls.
    pub fn spawn_expiry_monitor(&self, check_interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(check_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let deadline = store
                .credential()
                .and_then(|c| c.expires_at())
                .and_then(|at| (at - Utc::now()).to_std().ok());

            match deadline {
                Some(delay) => {
                    let one_shot = tokio::time::sleep(delay);
                    tokio::pin!(one_shot);
                    let mut fired = false;
                    loop {
                        tokio::select! {
                            _ = &mut one_shot, if !fired => {
                                fired = true;
                                store.expire_if_due();
                            }
                            _ = ticker.tick() => {
                                store.expire_if_due();
                            }
                        }
                    }
                }
                None => loop {
                    ticker.tick().await;
                    store.expire_if_due();
                },
            }
        })
    }

    /// Write or remove the session file. Persistence failures are logged
    /// and ignored; the in-memory session stays authoritative.
    fn persist(&self, session: Option<&Session>) {
        let Some(path) = (*self.path).as_ref() else {
            return;
        };
        let result = match session {
            Some(session) => serde_json::to_string(session)
                .map_err(std::io::Error::other)
                .and_then(|json| std::fs::write(path, json)),
            None => match std::fs::remove_file(path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, path = %path.display(), "Failed to persist session, continuing anyway");
        }
    }
}
