// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Grid dataset loading and point lookup.

use crate::models::grid::{GridFeature, GridGeometry, GridId};
use geo::{MultiPolygon, Polygon};
use geojson::GeoJson;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Attribute keys coerced from string to number at load time. Anything
/// outside this allow-list keeps its raw form.
const NUMERIC_KEYS: [&str; 9] = [
    "MSL",
    "MHWS",
    "MLWS",
    "HAT",
    "LAT",
    "Latitude",
    "Longitude",
    "X",
    "Y",
];

/// The vertical-datum grid: an ordered, immutable collection of cells
/// loaded once per consuming view.
#[derive(Debug, Default, Clone)]
pub struct GridDataset {
    features: Vec<GridFeature>,
}

impl GridDataset {
    /// Load the dataset from a GeoJSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| DatasetError::Io(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Fetch the dataset over HTTP. Unlike entitlement fetches, failures
    /// here are terminal for the view: nothing renders without geometry.
    pub async fn fetch(url: &str) -> Result<Self, DatasetError> {
        let response = reqwest::get(url)
            .await
            .map_err(|e| DatasetError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DatasetError::Http(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DatasetError::Transport(e.to_string()))?;
        Self::load_from_json(&body)
    }

    /// Load the dataset from a GeoJSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, DatasetError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| DatasetError::Parse(e.to_string()))?;

        let mut features = Vec::new();

        if let GeoJson::FeatureCollection(collection) = geojson {
            for feature in collection.features {
                let Some(id) = feature.property("GRID_ID").and_then(GridId::from_value) else {
                    tracing::warn!("Skipping feature without GRID_ID");
                    continue;
                };

                let Some(geom) = feature.geometry else {
                    tracing::warn!(grid_id = %id, "Skipping feature without geometry");
                    continue;
                };
                let geometry = Self::convert_geometry(geom.value)?;
                let envelope = geometry.envelope();

                let mut properties = feature.properties.unwrap_or_default();
                coerce_numeric_properties(&mut properties);

                features.push(GridFeature {
                    id,
                    geometry,
                    envelope,
                    properties,
                });
            }
        }

        // An empty collection is a data-integrity failure, not a
        // transport one; the two surface differently.
        if features.is_empty() {
            return Err(DatasetError::Empty);
        }

        tracing::info!(count = features.len(), "Loaded grid dataset");
        Ok(Self { features })
    }

    /// Convert GeoJSON geometry to our internal format.
    fn convert_geometry(value: geojson::Value) -> Result<GridGeometry, DatasetError> {
        use std::convert::TryInto;

        // Try as Polygon first
        let poly_result: Result<Polygon<f64>, _> = value.clone().try_into();
        if let Ok(poly) = poly_result {
            return Ok(GridGeometry::Polygon(poly));
        }

        // Try as MultiPolygon
        let multi_result: Result<MultiPolygon<f64>, _> = value.try_into();
        if let Ok(multi) = multi_result {
            return Ok(GridGeometry::MultiPolygon(multi));
        }

        Err(DatasetError::UnsupportedGeometry)
    }

    /// Cells in dataset order.
    pub fn features(&self) -> &[GridFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Exact lookup by normalized id.
    pub fn find_by_id(&self, id: &GridId) -> Option<&GridFeature> {
        self.features.iter().find(|f| f.id == *id)
    }

    /// Cells whose id contains the query substring, sorted by id. Feeds
    /// the grid browser's search box.
    pub fn find_matching(&self, query: &str) -> Vec<&GridFeature> {
        let query = query.trim();
        let mut matches: Vec<&GridFeature> = self
            .features
            .iter()
            .filter(|f| f.id.as_str().contains(query))
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches
    }

    /// First cell whose bounding envelope contains the query point, in
    /// dataset order. The test is envelope-based, not an exact
    /// point-in-polygon, and overlapping cells resolve to whichever
    /// comes first in the file - callers wanting the smallest enclosing
    /// cell will not get it here.
    pub fn find_containing(&self, lat: f64, lon: f64) -> Option<&GridFeature> {
        self.features.iter().find(|f| f.envelope_contains(lat, lon))
    }
}

/// Coerce numeric-looking string attributes in place. Values that fail
/// to parse keep their original form; they are never nulled or zeroed.
fn coerce_numeric_properties(properties: &mut serde_json::Map<String, Value>) {
    for key in NUMERIC_KEYS {
        let replacement = match properties.get(key) {
            Some(Value::String(raw)) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            _ => None,
        };
        if let Some(value) = replacement {
            properties.insert(key.to_string(), value);
        }
    }
}

/// Errors from dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read file: {0}")]
    Io(String),

    #[error("Failed to fetch dataset: {0}")]
    Transport(String),

    #[error("HTTP error! status: {0}")]
    Http(u16),

    #[error("Failed to parse dataset: {0}")]
    Parse(String),

    #[error("No features found in grid dataset")]
    Empty,

    #[error("Unsupported geometry type (expected Polygon or MultiPolygon)")]
    UnsupportedGeometry,
}
