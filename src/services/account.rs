// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login exchange and full-access application.

use crate::services::api::{ApiError, BackendClient, LoginMode};
use crate::services::credential::CredentialStore;
use crate::models::UserProfile;
use serde::Serialize;
use validator::Validate;

/// Fallback message when the login exchange fails without server text.
const LOGIN_FALLBACK: &str = "Login gagal di backend";

/// Fallback message when the application submit fails without server text.
const APPLY_FALLBACK: &str = "Failed to submit request. Please try again.";

/// Full-access application form, posted to the backend mailer endpoint.
/// Field names are the wire format.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccessApplication {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub instansi: String,
    pub job_title: String,
    pub keperluan: String,
}

/// Errors from account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Backend said no; carries the server text or a generic fallback.
    #[error("{0}")]
    Rejected(String),

    /// Field-local form validation failures, surfaced inline.
    #[error(transparent)]
    Invalid(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Api(ApiError),
}

/// Login, logout, and access-application flows.
#[derive(Clone)]
pub struct AccountService {
    api: BackendClient,
    store: CredentialStore,
}

impl AccountService {
    pub fn new(api: BackendClient, store: CredentialStore) -> Self {
        Self { api, store }
    }

    /// Exchange an identity-provider token for a backend credential and
    /// store the session. The profile comes from the identity provider
    /// and is cached for display only.
    pub async fn login_with_id_token(
        &self,
        id_token: &str,
        mode: LoginMode,
        profile: Option<UserProfile>,
    ) -> Result<(), AccountError> {
        let credential = self
            .api
            .exchange_id_token(id_token, mode)
            .await
            .map_err(|e| reject_or_api(e, LOGIN_FALLBACK))?;

        self.store.set_session(credential, profile);
        tracing::info!("Login exchange completed, session stored");
        Ok(())
    }

    /// Drop the stored session. Announces the change via the store.
    pub fn logout(&self) {
        self.store.clear();
    }

    /// Validate and submit the full-access application form.
    pub async fn request_full_access(
        &self,
        application: &AccessApplication,
    ) -> Result<(), AccountError> {
        application.validate()?;
        self.api
            .apply_for_access(application)
            .await
            .map_err(|e| reject_or_api(e, APPLY_FALLBACK))?;
        tracing::info!("Full-access application submitted");
        Ok(())
    }
}

fn reject_or_api(error: ApiError, fallback: &str) -> AccountError {
    match &error {
        ApiError::Rejected(_) => AccountError::Rejected(
            error
                .server_message()
                .unwrap_or(fallback)
                .to_string(),
        ),
        _ => AccountError::Api(error),
    }
}
