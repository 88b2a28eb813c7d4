// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credential;
pub mod entitlement;
pub mod grid;
pub mod search;

pub use credential::{Credential, Session, UserProfile};
pub use entitlement::{AccessTier, Entitlement};
pub use grid::{Area, GridFeature, GridGeometry, GridId};
pub use search::{SearchCoordinates, SearchError};
