// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: token forging and a mock OSDATUM backend.

// Each test binary compiles this module and uses a different slice of it.
#![allow(dead_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Forge a bearer token whose expiry lies `offset_secs` from now.
/// The client never verifies signatures, so any signing key works.
#[allow(dead_code)]
pub fn make_token(offset_secs: i64) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
        iat: i64,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: "test-user".to_string(),
        iat: now,
        exp: now + offset_secs,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"test_signing_key_32_bytes_long!!"),
    )
    .expect("Failed to create token")
}

/// A minimal GeoJSON grid dataset used across the tests.
///
/// Grid 12: 1x1 degree cell around (107, -5.5) with numeric-string
/// datums. Grid 94: overlapping cell with an "N/A" MSL. Grid 95: far
/// away, plain numeric datums.
#[allow(dead_code)]
pub fn dataset_json() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "GRID_ID": 12,
                    "MSL": "12.500",
                    "MHWS": "13.100",
                    "MLWS": "11.900",
                    "Latitude": "-5.5",
                    "Longitude": "107.0"
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [106.5, -6.0], [107.5, -6.0], [107.5, -5.0], [106.5, -5.0], [106.5, -6.0]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "GRID_ID": 94,
                    "MSL": "N/A",
                    "HAT": "14.000",
                    "Latitude": "-5.6",
                    "Longitude": "107.2"
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [107.0, -6.0], [108.0, -6.0], [108.0, -5.0], [107.0, -5.0], [107.0, -6.0]
                    ]]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "GRID_ID": "95",
                    "MSL": 9.25,
                    "MHWS": 10.0,
                    "MLWS": 8.5,
                    "HAT": 10.75,
                    "LAT": 8.0,
                    "Latitude": -4.0,
                    "Longitude": 110.0
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [109.5, -4.5], [110.5, -4.5], [110.5, -3.5], [109.5, -3.5], [109.5, -4.5]
                    ]]
                }
            }
        ]
    })
    .to_string()
}

/// Mutable behavior of the mock backend.
#[derive(Debug)]
struct BackendInner {
    access: String,
    purchased: Vec<String>,
    access_status: u16,
    access_raw: Option<String>,
    purchase_error: Option<String>,
    dataset_status: u16,
}

impl Default for BackendInner {
    fn default() -> Self {
        Self {
            access: "free".to_string(),
            purchased: Vec::new(),
            access_status: 200,
            access_raw: None,
            purchase_error: None,
            dataset_status: 200,
        }
    }
}

/// Handle to a running mock backend.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<BackendInner>>,
    access_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockBackend {
    /// Spawn the mock on an ephemeral port; returns (backend, base_url).
    pub async fn spawn() -> (Self, String) {
        let backend = Self::default();

        let router = Router::new()
            .route("/api/user/access", get(handle_access))
            .route("/api/user/purchase/grid", post(handle_purchase))
            .route("/api/user/subscribe", post(handle_subscribe))
            .route("/api/auth/firebase", post(handle_auth))
            .route("/api/subscription/apply", post(handle_apply))
            .route("/data/datumvertikal.geojson", get(handle_dataset))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("No local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        (backend, format!("http://{}", addr))
    }

    pub fn set_access(&self, access: &str) {
        self.inner.lock().unwrap().access = access.to_string();
    }

    pub fn set_purchased(&self, ids: &[&str]) {
        self.inner.lock().unwrap().purchased = ids.iter().map(|s| s.to_string()).collect();
    }

    /// Make GET /api/user/access answer with this status and no body.
    pub fn fail_access(&self, status: u16) {
        self.inner.lock().unwrap().access_status = status;
    }

    /// Make GET /api/user/access answer 200 with this raw body.
    pub fn raw_access(&self, body: &str) {
        self.inner.lock().unwrap().access_raw = Some(body.to_string());
    }

    /// Make purchases fail with this server error text.
    pub fn reject_purchases(&self, error: &str) {
        self.inner.lock().unwrap().purchase_error = Some(error.to_string());
    }

    /// Make the static dataset answer with this status.
    pub fn fail_dataset(&self, status: u16) {
        self.inner.lock().unwrap().dataset_status = status;
    }

    /// Grid ids purchased so far, in request order.
    pub fn purchased(&self) -> Vec<String> {
        self.inner.lock().unwrap().purchased.clone()
    }

    /// Number of GET /api/user/access requests served.
    pub fn access_calls(&self) -> usize {
        self.access_calls.load(Ordering::SeqCst)
    }
}

async fn handle_access(State(backend): State<MockBackend>) -> Response {
    backend.access_calls.fetch_add(1, Ordering::SeqCst);
    let inner = backend.inner.lock().unwrap();

    if inner.access_status != 200 {
        let status = StatusCode::from_u16(inner.access_status).unwrap_or(StatusCode::BAD_GATEWAY);
        return status.into_response();
    }
    if let Some(raw) = &inner.access_raw {
        return (
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            raw.clone(),
        )
            .into_response();
    }

    Json(json!({
        "access": inner.access,
        "purchasedGrids": inner.purchased,
    }))
    .into_response()
}

async fn handle_purchase(
    State(backend): State<MockBackend>,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = backend.inner.lock().unwrap();

    if let Some(error) = &inner.purchase_error {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": error })),
        )
            .into_response();
    }

    let grid_id = body
        .get("gridId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    inner.purchased.push(grid_id);

    Json(json!({ "success": true })).into_response()
}

async fn handle_subscribe(
    State(backend): State<MockBackend>,
    Json(_body): Json<Value>,
) -> Response {
    backend.inner.lock().unwrap().access = "subscription".to_string();
    Json(json!({ "success": true })).into_response()
}

async fn handle_auth(State(_backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let id_token = body.get("idToken").and_then(Value::as_str).unwrap_or_default();
    if id_token == "good-id-token" {
        Json(json!({ "token": make_token(3600) })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Akun Google Anda belum terdaftar" })),
        )
            .into_response()
    }
}

async fn handle_dataset(State(backend): State<MockBackend>) -> Response {
    let status = backend.inner.lock().unwrap().dataset_status;
    if status != 200 {
        return StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response();
    }
    (
        [(axum::http::header::CONTENT_TYPE, "application/geo+json")],
        dataset_json(),
    )
        .into_response()
}

async fn handle_apply(State(_backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    if email.ends_with("@reject.example") {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Request could not be processed" })),
        )
            .into_response()
    } else {
        Json(json!({})).into_response()
    }
}
