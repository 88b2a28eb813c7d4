// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coordinate search input validation.

use validator::Validate;

/// Validated coordinate pair from the map search form.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct SearchCoordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

/// Field-local, non-blocking validation failures. The messages are shown
/// inline next to the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("Please enter valid coordinates")]
    Malformed,
    #[error("Coordinates out of valid range")]
    OutOfRange,
}

impl SearchCoordinates {
    /// Parse the two text fields of the search form.
    pub fn parse(lat: &str, lon: &str) -> Result<Self, SearchError> {
        let lat: f64 = lat.trim().parse().map_err(|_| SearchError::Malformed)?;
        let lon: f64 = lon.trim().parse().map_err(|_| SearchError::Malformed)?;
        if lat.is_nan() || lon.is_nan() {
            return Err(SearchError::Malformed);
        }

        let coords = Self { lat, lon };
        coords.validate().map_err(|_| SearchError::OutOfRange)?;
        Ok(coords)
    }
}
