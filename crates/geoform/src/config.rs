//! Map configuration, usually read from a `geoform.toml` file.
//!
//! ```toml
//! [projection]
//! planet_radius = 6371000.0
//! anchor = { lon = -71.059705, lat = 42.360888 }
//! reference_up = [0.0, 1.0, 0.0]
//!
//! [layers]
//! graticule = false
//! ```
//!
//! Every field is optional and falls back to the defaults shown above.

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ProjectorError};
use crate::geo::{EARTH_RADIUS, GeographicPoint};
use crate::projector::Projector;

/// Default anchor: downtown Boston.
pub const DEFAULT_ANCHOR: GeographicPoint = GeographicPoint::ground(-71.059_705, 42.360_888);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub projection: ProjectionConfig,
    pub layers: LayersConfig,
}

/// Frame settings, fixed for the lifetime of a loaded map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Sphere radius in meters.
    pub planet_radius: f64,
    pub anchor: AnchorConfig,
    /// Axis the anchor's local up is aligned with.
    pub reference_up: [f64; 3],
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            planet_radius: EARTH_RADIUS,
            anchor: AnchorConfig::default(),
            reference_up: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorConfig {
    pub lon: f64,
    pub lat: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            lon: DEFAULT_ANCHOR.lon,
            lat: DEFAULT_ANCHOR.lat,
        }
    }
}

/// Optional extra layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayersConfig {
    /// Add a 10° graticule to the line features.
    pub graticule: bool,
}

impl MapConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded map config");
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Build the projector described by the `[projection]` table.
    pub fn projector(&self) -> Result<Projector, ProjectorError> {
        let p = &self.projection;
        Projector::with_planet_radius(
            p.planet_radius,
            GeographicPoint::ground(p.anchor.lon, p.anchor.lat),
            DVec3::from_array(p.reference_up),
        )
    }
}
