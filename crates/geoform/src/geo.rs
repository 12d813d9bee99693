//! Geographic points and the spherical planet model.
//!
//! Provides conversions between geographic coordinates (longitude, latitude,
//! altitude) and planet-centered Cartesian coordinates.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Mean planet radius in meters.
pub const EARTH_RADIUS: f64 = 6.371e6;

/// A point given as longitude and latitude in degrees plus altitude in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeographicPoint {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Altitude above the planet surface in meters.
    #[serde(default)]
    pub alt: f64,
}

impl GeographicPoint {
    #[must_use]
    pub const fn new(lon: f64, lat: f64, alt: f64) -> Self {
        Self { lon, lat, alt }
    }

    /// A point on the planet surface.
    #[must_use]
    pub const fn ground(lon: f64, lat: f64) -> Self {
        Self { lon, lat, alt: 0.0 }
    }

    /// The same location raised by `meters`.
    #[must_use]
    pub fn raised(self, meters: f64) -> Self {
        Self {
            alt: self.alt + meters,
            ..self
        }
    }

    /// Returns true if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite() && self.alt.is_finite()
    }
}

/// Convert a geographic point to planet-centered Cartesian coordinates.
///
/// Uses a spherical planet of radius `planet_radius`; altitude is added to
/// the radius.
#[must_use]
pub fn lat_lon_to_ecef(point: GeographicPoint, planet_radius: f64) -> DVec3 {
    let lambda = point.lon.to_radians();
    let phi = point.lat.to_radians();
    let radius = planet_radius + point.alt;
    DVec3::new(
        radius * phi.cos() * lambda.cos(),
        radius * phi.cos() * lambda.sin(),
        radius * phi.sin(),
    )
}

/// Convert planet-centered coordinates back to latitude and longitude (degrees).
#[must_use]
pub fn ecef_to_lat_lon(position: DVec3) -> (f64, f64) {
    let lat_rad = (position.z / position.length()).asin();
    let lon_rad = position.y.atan2(position.x);
    (lat_rad.to_degrees(), lon_rad.to_degrees())
}
