// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Crate-level error type aggregating the per-service errors.

use crate::config::ConfigError;
use crate::services::account::AccountError;
use crate::services::api::ApiError;
use crate::services::dataset::DatasetError;
use crate::services::purchase::PurchaseError;

/// Application error type. Services keep their own error enums; this is
/// the aggregate the binary and embedding shells work with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dataset failures are terminal for the consuming view: without
    /// geometry there is nothing to render.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Purchase(#[from] PurchaseError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for app-level operations
pub type Result<T> = std::result::Result<T, AppError>;
