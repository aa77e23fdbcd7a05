//! Coordinate types and geodesic distance for amenity-finder.
//!
//! Distances are computed on the WGS84 ellipsoid via the `geo` crate's
//! geodesic algorithms (Karney's method), which stays finite for antipodal
//! and near-pole inputs. Coordinate ranges are validated here; callers that
//! skip validation get a typed error back instead of a bogus number.

use geo::{GeodesicDistance, Point};
use thiserror::Error;

/// A pair of decimal-degree coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are within the valid WGS84 ranges
    /// (latitude -90..=90, longitude -180..=180).
    pub fn is_in_range(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Errors from coordinate math
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// One of the inputs is outside the valid latitude/longitude ranges
    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },
}

/// Computes the ellipsoidal geodesic distance between two points, in meters.
///
/// Symmetric, and zero exactly when the two points are coordinate-identical.
/// Returns [`GeoError::OutOfRange`] if either input has an out-of-range
/// component.
pub fn distance_between(a: Coordinates, b: Coordinates) -> Result<f64, GeoError> {
    for point in [&a, &b] {
        if !point.is_in_range() {
            return Err(GeoError::OutOfRange {
                latitude: point.latitude,
                longitude: point.longitude,
            });
        }
    }

    // geo points are (x, y) = (longitude, latitude)
    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);

    Ok(from.geodesic_distance(&to))
}
