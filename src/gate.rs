// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Access gate: the single decision function for grid visibility.
//!
//! Every surface that shows or hides grid data (map popup, grid browser,
//! grid detail) branches on [`decide`] and nothing else, so the same grid
//! reports the same outcome everywhere.

use crate::models::{AccessTier, Entitlement, GridId};

/// Displayed price of a single-grid lifetime unlock, in USD.
pub const GRID_ACCESS_PRICE_USD: f64 = 99.99;

/// Displayed price of the monthly subscription plan, in USD.
pub const SUBSCRIPTION_MONTHLY_PRICE_USD: f64 = 29.99;

/// Displayed price of the yearly subscription plan, in USD.
pub const SUBSCRIPTION_YEARLY_PRICE_USD: f64 = 299.99;

/// Why a grid is unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockReason {
    Subscription,
    Purchase,
}

/// Outcome of the access decision for one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Locked,
    Unlocked(UnlockReason),
}

impl AccessDecision {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, AccessDecision::Unlocked(_))
    }
}

/// Decide whether a grid is visible under the given entitlement.
///
/// A subscription unlocks every grid regardless of the purchase set;
/// otherwise membership of the normalized id in the purchased set
/// decides. Pure function, no I/O.
pub fn decide(entitlement: &Entitlement, grid_id: &GridId) -> AccessDecision {
    if entitlement.tier == AccessTier::Subscribed {
        return AccessDecision::Unlocked(UnlockReason::Subscription);
    }
    if entitlement.is_purchased(grid_id) {
        return AccessDecision::Unlocked(UnlockReason::Purchase);
    }
    AccessDecision::Locked
}
