// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer credential and cached user profile.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Expiry claim embedded in the backend-issued token. The client never
/// holds the signing key, so only the payload is read.
#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// Opaque bearer token. Presence implies "authenticated"; the only claim
/// the client inspects is the embedded expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the embedded expiry claim. Returns `None` when the token
    /// cannot be decoded.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(&self.0, &DecodingKey::from_secret(&[]), &validation).ok()?;
        Utc.timestamp_opt(data.claims.exp, 0).single()
    }

    /// True when the embedded expiry is in the past. A token that fails to
    /// decode is treated as expired (fail-closed).
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(at) => at < Utc::now(),
            None => true,
        }
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Profile cached from the identity provider at login time. Display-only;
/// never re-validated against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

/// Persisted session: the credential plus the cached profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub credential: Credential,
    pub profile: Option<UserProfile>,
}
