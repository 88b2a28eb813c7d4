// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Grid cell model: identifiers, area classification, and per-cell
//! geometry with tidal datum attributes.

use geo::{BoundingRect, MultiPolygon, Polygon, Rect};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Datum attribute keys carried by each grid cell.
pub const DATUM_KEYS: [&str; 5] = ["MSL", "MHWS", "MLWS", "HAT", "LAT"];

/// Human-readable descriptions for the datum keys, in display order.
pub const DATUM_DESCRIPTIONS: [(&str, &str); 5] = [
    ("MHWS", "Mean High Water Spring"),
    ("MLWS", "Mean Low Water Spring"),
    ("MSL", "Mean Sea Level"),
    ("HAT", "Highest Astronomical Tide"),
    ("LAT", "Lowest Astronomical Tide"),
];

/// Highest grid id belonging to the OSES working area.
pub const OSES_MAX_GRID_ID: i64 = 94;

/// Normalized grid identifier.
///
/// The dataset stores ids as bare numbers while entitlement payloads and
/// query parameters carry them as strings; both forms normalize to the
/// same value so membership tests agree everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridId(String);

impl GridId {
    /// Normalize a raw identifier. Integer-valued inputs (including
    /// zero-padded or float-formatted ones) collapse to their canonical
    /// integer form; anything else is kept as the trimmed string.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self(n.to_string());
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() && f.fract() == 0.0 {
                return Self((f as i64).to_string());
            }
        }
        Self(trimmed.to_string())
    }

    /// Build from a raw JSON property value (number or string).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::from(i))
                } else {
                    n.as_f64().map(|f| Self::new(f.to_string()))
                }
            }
            Value::String(s) => Some(Self::new(s)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form, when the id is numeric.
    pub fn numeric(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Zero-padded three-wide display label ("094").
    pub fn padded(&self) -> String {
        format!("{:0>3}", self.0)
    }
}

impl From<i64> for GridId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<&str> for GridId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for GridId {
    /// Numeric ids order numerically (the grid browser sorts by number);
    /// non-numeric ids sort after them, lexicographically.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for GridId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for GridId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GridId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("grid id must be a number or string"))
    }
}

/// Working area a grid cell belongs to. Fixed partition of the dataset:
/// ids up to 94 are OSES, everything else is ONWJ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "OSES")]
    Oses,
    #[serde(rename = "ONWJ")]
    Onwj,
}

impl Area {
    pub fn classify(id: &GridId) -> Self {
        match id.numeric() {
            Some(n) if n <= OSES_MAX_GRID_ID => Area::Oses,
            _ => Area::Onwj,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Area::Oses => "OSES",
            Area::Onwj => "ONWJ",
        })
    }
}

/// Grid cell geometry - either a simple polygon or multi-polygon.
#[derive(Debug, Clone)]
pub enum GridGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl GridGeometry {
    /// Bounding envelope of the geometry, if it has any coordinates.
    pub fn envelope(&self) -> Option<Rect<f64>> {
        match self {
            GridGeometry::Polygon(p) => p.bounding_rect(),
            GridGeometry::MultiPolygon(mp) => mp.bounding_rect(),
        }
    }
}

/// One cell of the vertical-datum grid.
#[derive(Debug, Clone)]
pub struct GridFeature {
    /// Normalized identifier (`GRID_ID` in the dataset).
    pub id: GridId,
    /// Cell boundary geometry.
    pub geometry: GridGeometry,
    /// Bounding envelope, precomputed at load time for point lookups.
    pub envelope: Option<Rect<f64>>,
    /// Raw attributes after numeric coercion. Values that failed to parse
    /// as numbers keep their original form.
    pub properties: serde_json::Map<String, Value>,
}

impl GridFeature {
    /// Numeric datum value for a key, when present and numeric.
    pub fn datum(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.datum("Longitude")
    }

    pub fn latitude(&self) -> Option<f64> {
        self.datum("Latitude")
    }

    /// Count of datum attributes present on this cell (out of five).
    pub fn available_datums(&self) -> usize {
        DATUM_KEYS
            .iter()
            .filter(|key| matches!(self.properties.get(**key), Some(v) if !v.is_null()))
            .count()
    }

    pub fn area(&self) -> Area {
        Area::classify(&self.id)
    }

    /// Inclusive point-in-envelope test against the precomputed bounds.
    pub fn envelope_contains(&self, lat: f64, lon: f64) -> bool {
        match &self.envelope {
            Some(rect) => {
                rect.min().x <= lon && lon <= rect.max().x && rect.min().y <= lat && lat <= rect.max().y
            }
            None => false,
        }
    }
}
