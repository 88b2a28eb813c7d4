// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resolved access rights for the current user.

use crate::models::grid::GridId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Access tier granted by the backend. Per-grid purchases are tracked
/// orthogonally in [`Entitlement::purchased_grids`]; a `Subscribed` user
/// is unlocked for every grid regardless of that set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessTier {
    #[default]
    Free,
    Subscribed,
}

/// Entitlement for the current credential. Recomputed wholesale on every
/// auth or purchase change, never incrementally patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entitlement {
    pub tier: AccessTier,
    pub purchased_grids: HashSet<GridId>,
}

impl Entitlement {
    /// The fail-safe default: free tier, nothing purchased.
    pub fn free() -> Self {
        Self::default()
    }

    /// Membership test after id normalization, so numeric and string
    /// forms of the same id agree.
    pub fn is_purchased(&self, id: &GridId) -> bool {
        self.purchased_grids.contains(id)
    }
}
