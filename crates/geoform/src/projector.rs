//! Projection from geographic coordinates into the local map frame.
//!
//! The local frame has its origin at a fixed anchor point and is rotated so
//! that the anchor's "up" direction (away from the planet center) lies along
//! a fixed reference axis, typically +Y.
//!
//! # Pipeline
//!
//! ```text
//! (lon, lat, alt)  →  planet-centered XYZ  →  minus anchor  →  rotated local XYZ
//! ```

use glam::{DMat3, DVec3};

use crate::error::ProjectorError;
use crate::geo::{EARTH_RADIUS, GeographicPoint, lat_lon_to_ecef};

/// Height of the second sample used to derive the anchor's up direction.
const UP_SAMPLE_ALTITUDE: f64 = 2.0;

/// `1 + a·b` below this is treated as antiparallel.
const ANTIPARALLEL_EPSILON: f64 = 1e-12;

/// Immutable projection state for one loaded map.
///
/// Built once from the anchor and reference axis, then shared by reference
/// with every stage that emits geometry. The value is `Send + Sync`, so
/// constructing it is the only ordering requirement for parallel callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    planet_radius: f64,
    anchor: GeographicPoint,
    reference_up: DVec3,
    local_up: DVec3,
    origin: DVec3,
    /// Maps `reference_up` onto `local_up`.
    rotation: DMat3,
    /// Inverse of `rotation`; maps `local_up` onto `reference_up`.
    alignment: DMat3,
}

impl Projector {
    /// Create a projector on a planet of [`EARTH_RADIUS`].
    pub fn new(anchor: GeographicPoint, reference_up: DVec3) -> Result<Self, ProjectorError> {
        Self::with_planet_radius(EARTH_RADIUS, anchor, reference_up)
    }

    /// Create a projector on a planet of the given radius in meters.
    pub fn with_planet_radius(
        planet_radius: f64,
        anchor: GeographicPoint,
        reference_up: DVec3,
    ) -> Result<Self, ProjectorError> {
        if !planet_radius.is_finite() || planet_radius <= 0.0 {
            return Err(ProjectorError::InvalidRadius(planet_radius));
        }
        if !anchor.is_finite() {
            return Err(ProjectorError::InvalidAnchor {
                lon: anchor.lon,
                lat: anchor.lat,
            });
        }
        let Some(reference_up) = reference_up.try_normalize() else {
            return Err(ProjectorError::InvalidAxis {
                x: reference_up.x,
                y: reference_up.y,
                z: reference_up.z,
            });
        };

        let origin = lat_lon_to_ecef(anchor, planet_radius);
        let above = lat_lon_to_ecef(anchor.raised(UP_SAMPLE_ALTITUDE), planet_radius);
        let local_up = (above - origin).normalize();

        let rotation = rotation_between(reference_up, local_up);
        let alignment = rotation.transpose();

        tracing::debug!(
            lon = anchor.lon,
            lat = anchor.lat,
            planet_radius,
            "projector initialized"
        );

        Ok(Self {
            planet_radius,
            anchor,
            reference_up,
            local_up,
            origin,
            rotation,
            alignment,
        })
    }

    /// Project onto the planet-centered frame (no anchoring, no rotation).
    #[must_use]
    pub fn project(&self, point: GeographicPoint) -> DVec3 {
        lat_lon_to_ecef(point, self.planet_radius)
    }

    /// Project into the local, anchored and rotated frame.
    #[must_use]
    pub fn to_local(&self, point: GeographicPoint) -> DVec3 {
        self.alignment * (self.project(point) - self.origin)
    }

    #[must_use]
    pub fn planet_radius(&self) -> f64 {
        self.planet_radius
    }

    #[must_use]
    pub fn anchor(&self) -> GeographicPoint {
        self.anchor
    }

    /// The anchor in planet-centered coordinates.
    #[must_use]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Unit vector pointing away from the planet center at the anchor,
    /// in planet-centered coordinates.
    #[must_use]
    pub fn local_up(&self) -> DVec3 {
        self.local_up
    }

    /// The (normalized) axis that local up is aligned with.
    #[must_use]
    pub fn reference_up(&self) -> DVec3 {
        self.reference_up
    }

    /// Rotation carrying the reference axis onto local up.
    ///
    /// [`Projector::to_local`] applies the inverse of this matrix.
    #[must_use]
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }
}

/// Rotation matrix that maps unit vector `a` onto unit vector `b`.
///
/// Rodrigues' formula `R = I + [v]× + [v]×² / (1 + c)` with `v = a × b` and
/// `c = a · b`. The formula is singular for antiparallel vectors; those get a
/// half turn about an axis perpendicular to `a`.
#[must_use]
pub fn rotation_between(a: DVec3, b: DVec3) -> DMat3 {
    let v = a.cross(b);
    let c = a.dot(b);

    if (1.0 + c).abs() < ANTIPARALLEL_EPSILON {
        let n = a.any_orthonormal_vector();
        return DMat3::from_cols(n * (2.0 * n.x), n * (2.0 * n.y), n * (2.0 * n.z))
            - DMat3::IDENTITY;
    }

    // Skew-symmetric cross-product matrix, column-major.
    let vx = DMat3::from_cols(
        DVec3::new(0.0, v.z, -v.y),
        DVec3::new(-v.z, 0.0, v.x),
        DVec3::new(v.y, -v.x, 0.0),
    );

    DMat3::IDENTITY + vx + (vx * vx) * (1.0 / (1.0 + c))
}
