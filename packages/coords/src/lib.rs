#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate correction for the Gaode (`AMap`) reverse geocoder.
//!
//! Gaode expects query coordinates in the GCJ-02 datum, which is offset
//! from the WGS-84 readings a GPS receiver produces by a deterministic,
//! non-linear transform. This crate implements the public offline
//! approximation of that transform ([`wgs84_to_gcj02`]) and nothing
//! else. Points outside the [`COVERAGE`] envelope (roughly mainland
//! China) pass through unchanged.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Semi-major axis of the Krasovsky 1940 ellipsoid, in metres.
const A: f64 = 6_378_245.0;

/// First eccentricity squared of the Krasovsky 1940 ellipsoid.
const EE: f64 = 0.006_693_421_622_965_943;

/// Mean metres per degree of latitude, used by [`offset_meters`].
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Errors from constructing a [`GeoPoint`].
#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    /// Latitude or longitude is non-finite or outside its valid range.
    #[error("Coordinate out of range: lat={latitude}, lon={longitude}")]
    OutOfRange {
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },
}

/// A latitude/longitude pair in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in degrees, `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, `[-180, 180]`.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point after checking both components are finite and in
    /// range.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::OutOfRange`] for NaN, infinite, or
    /// out-of-range components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(CoordinateError::OutOfRange {
                latitude,
                longitude,
            })
        }
    }

    /// Creates a point without range checks.
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Formats the point as Gaode's `location` query parameter:
    /// `"<lon>,<lat>"` with six fixed decimals.
    #[must_use]
    pub fn to_query_param(&self) -> String {
        format!("{:.6},{:.6}", self.longitude, self.latitude)
    }
}

/// A longitude/latitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageEnvelope {
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl CoverageEnvelope {
    /// Whether `(lon, lat)` lies inside the envelope, edges inclusive.
    #[must_use]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }
}

/// Box approximating mainland China. The GCJ-02 correction is only
/// applied inside it.
pub const COVERAGE: CoverageEnvelope = CoverageEnvelope {
    min_lon: 72.004,
    max_lon: 137.8347,
    min_lat: 0.8293,
    max_lat: 55.8271,
};

/// Whether a point falls inside [`COVERAGE`].
#[must_use]
pub fn is_in_coverage(point: GeoPoint) -> bool {
    COVERAGE.contains(point.longitude, point.latitude)
}

/// Converts a WGS-84 point to GCJ-02.
///
/// Returns the input unchanged when it lies outside [`COVERAGE`].
#[must_use]
pub fn wgs84_to_gcj02(point: GeoPoint) -> GeoPoint {
    let (latitude, longitude) = transform(point.latitude, point.longitude);
    GeoPoint {
        latitude,
        longitude,
    }
}

/// Tuple form of [`wgs84_to_gcj02`]: `(lat, lon)` in, `(lat, lon)` out.
#[must_use]
pub fn transform(lat: f64, lon: f64) -> (f64, f64) {
    if !COVERAGE.contains(lon, lat) {
        return (lat, lon);
    }

    let (d_lat, d_lon) = delta(lat, lon);
    (lat + d_lat, lon + d_lon)
}

/// Offset in degrees to add to a WGS-84 `(lat, lon)`.
#[allow(clippy::suboptimal_flops)]
fn delta(lat: f64, lon: f64) -> (f64, f64) {
    let x = lon - 105.0;
    let y = lat - 35.0;
    let d_lat = transform_lat(x, y);
    let d_lon = transform_lon(x, y);

    let rad_lat = lat / 180.0 * PI;
    let magic = rad_lat.sin();
    let magic = 1.0 - EE * magic * magic;
    let sqrt_magic = magic.sqrt();

    // Metres to degrees via the local radii of curvature.
    let d_lat = (d_lat * 180.0) / ((A * (1.0 - EE)) / (magic * sqrt_magic) * PI);
    let d_lon = (d_lon * 180.0) / (A / sqrt_magic * rad_lat.cos() * PI);

    (d_lat, d_lon)
}

#[allow(clippy::suboptimal_flops)]
fn transform_lat(x: f64, y: f64) -> f64 {
    let mut ret = -100.0 + 2.0 * x + 3.0 * y + 0.2 * y * y + 0.1 * x * y + 0.2 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (y * PI).sin() + 40.0 * (y / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (160.0 * (y / 12.0 * PI).sin() + 320.0 * (y * PI / 30.0).sin()) * 2.0 / 3.0;
    ret
}

#[allow(clippy::suboptimal_flops)]
fn transform_lon(x: f64, y: f64) -> f64 {
    let mut ret = 300.0 + x + 2.0 * y + 0.1 * x * x + 0.1 * x * y + 0.1 * x.abs().sqrt();
    ret += (20.0 * (6.0 * x * PI).sin() + 20.0 * (2.0 * x * PI).sin()) * 2.0 / 3.0;
    ret += (20.0 * (x * PI).sin() + 40.0 * (x / 3.0 * PI).sin()) * 2.0 / 3.0;
    ret += (150.0 * (x / 12.0 * PI).sin() + 300.0 * (x / 30.0 * PI).sin()) * 2.0 / 3.0;
    ret
}

/// Approximate ground distance in metres between two nearby points
/// (equirectangular projection). Only meaningful over short distances.
#[must_use]
pub fn offset_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let mean_lat = ((a.latitude + b.latitude) / 2.0).to_radians();
    let dy = (b.latitude - a.latitude) * METERS_PER_DEGREE;
    let dx = (b.longitude - a.longitude) * METERS_PER_DEGREE * mean_lat.cos();
    dx.hypot(dy)
}
