// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend API client.
//!
//! Thin typed wrapper over the OSDATUM backend endpoints. Response shapes
//! are decoded once at this boundary into tagged results; callers never
//! see raw payloads.

use crate::models::grid::GridId;
use crate::models::Credential;
use crate::services::account::AccessApplication;
use serde::{Deserialize, Serialize};

/// Backend API client.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Access tier and purchased grid ids for the given credential.
    ///
    /// GET /api/user/access, bearer header.
    pub async fn fetch_access(&self, credential: &Credential) -> Result<AccessResponse, ApiError> {
        let url = format!("{}/api/user/access", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(credential.as_str())
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Purchase one grid. The id is posted in its normalized string form.
    ///
    /// POST /api/user/purchase/grid, body `{ gridId }`, bearer header.
    pub async fn purchase_grid(
        &self,
        credential: &Credential,
        grid_id: &GridId,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/user/purchase/grid", self.base_url);
        let body = serde_json::json!({ "gridId": grid_id });

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        self.check_transaction(response).await
    }

    /// Start a subscription.
    ///
    /// POST /api/user/subscribe, body `{ planType }`, bearer header.
    pub async fn subscribe(
        &self,
        credential: &Credential,
        plan: PlanType,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/user/subscribe", self.base_url);
        let body = serde_json::json!({ "planType": plan });

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        self.check_transaction(response).await
    }

    /// Exchange an identity-provider token for a backend credential.
    ///
    /// POST /api/auth/firebase, body `{ idToken, mode }`.
    pub async fn exchange_id_token(
        &self,
        id_token: &str,
        mode: LoginMode,
    ) -> Result<Credential, ApiError> {
        let url = format!("{}/api/auth/firebase", self.base_url);
        let body = serde_json::json!({ "idToken": id_token, "mode": mode });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        // The auth endpoint reports failures inside the payload even on
        // non-2xx statuses, so decode before checking the status code.
        let status = response.status();
        let payload: TokenExchangeResponse = response
            .json()
            .await
            .map_err(|_| ApiError::Status {
                status: status.as_u16(),
                body: String::new(),
            })?;

        match payload.token {
            Some(token) if status.is_success() => Ok(Credential::new(token)),
            _ => Err(ApiError::Rejected(payload.error)),
        }
    }

    /// Submit the full-access application form.
    ///
    /// POST /api/subscription/apply.
    pub async fn apply_for_access(
        &self,
        application: &AccessApplication,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/subscription/apply", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(application)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => Err(ApiError::Rejected(body.error)),
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Decode a `{ success, error? }` transaction payload into a tagged
    /// result. Transaction endpoints report rejections in the body, with
    /// or without a 2xx status.
    async fn check_transaction(&self, response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        match response.json::<TransactionResponse>().await {
            Ok(body) if status.is_success() && body.success => Ok(()),
            Ok(body) => Err(ApiError::Rejected(body.error)),
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }
}

/// Errors from backend API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    /// The backend processed the request and said no. Carries the
    /// server-provided error text when there is one.
    #[error("Rejected by backend")]
    Rejected(Option<String>),
}

impl ApiError {
    /// Server-provided rejection text, when the backend supplied one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(Some(msg)) if !msg.is_empty() => Some(msg),
            _ => None,
        }
    }
}

/// Payload of GET /api/user/access.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    /// `"free"` or `"subscription"`.
    pub access: String,
    #[serde(default)]
    pub purchased_grids: Vec<String>,
}

/// Subscription plan selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Monthly,
    Yearly,
}

/// Mode flag of the identity-token exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
    Login,
    Register,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}
