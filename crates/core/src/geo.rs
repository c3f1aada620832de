// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Great-circle distance math for geofence evaluation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Errors for coordinate construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("coordinates must be finite numbers, got ({lat}, {lon})")]
    NonFinite { lat: f64, lon: f64 },
}

/// A worker or site position. Finiteness is checked here, at the boundary;
/// everything downstream may treat coordinates as plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeoError::NonFinite { lat, lon });
        }
        Ok(Self { lat, lon })
    }
}

/// Haversine great-circle distance in meters. Pure and total for finite
/// coordinates; never negative.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn zero_distance_for_identical_points() {
        let p = point(44.4268, 26.1025);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn known_distance_bucharest_to_cluj() {
        // Bucharest -> Cluj-Napoca, roughly 324 km
        let bucharest = point(44.4268, 26.1025);
        let cluj = point(46.7712, 23.6236);
        let d = distance_meters(bucharest, cluj);
        assert!((d - 324_000.0).abs() < 5_000.0, "got {d}");
    }

    #[test]
    fn small_offsets_resolve_to_meters() {
        // ~0.0009 degrees of latitude is ~100 m
        let site = point(44.4268, 26.1025);
        let nearby = point(44.4277, 26.1025);
        let d = distance_meters(site, nearby);
        assert!((50.0..150.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(44.4268, 26.1025);
        let b = point(44.44, 26.2);
        assert!((distance_meters(a, b) - distance_meters(b, a)).abs() < 1e-9);
    }

    #[test]
    fn non_finite_coordinates_rejected() {
        assert!(GeoPoint::new(f64::NAN, 26.0).is_err());
        assert!(GeoPoint::new(44.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(44.0, 26.0).is_ok());
    }
}
