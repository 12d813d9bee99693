//! Error types for geometry generation and input handling.

use std::fmt;
use std::path::PathBuf;

/// Errors that make a single feature's geometry impossible to build.
///
/// These are fatal for the feature only; the map builder records them and
/// continues with the rest of the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A polygon carried no rings at all.
    NoRings,
    /// A ring has too few distinct points to enclose an area.
    DegenerateRing {
        /// Position of the ring within the polygon (0 = outer).
        ring: usize,
        /// Number of distinct points left after dropping the closing point.
        points: usize,
    },
    /// The requested height lies below the base offset.
    InvertedHeight { height: f64, min_height: f64 },
    /// The cap triangulation failed.
    Triangulation(String),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRings => write!(f, "polygon has no rings"),
            Self::DegenerateRing { ring, points } => {
                write!(f, "ring {ring} has only {points} distinct points")
            }
            Self::InvertedHeight { height, min_height } => {
                write!(f, "height {height} is below min_height {min_height}")
            }
            Self::Triangulation(message) => write!(f, "cap triangulation failed: {message}"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors raised while setting up a [`crate::Projector`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectorError {
    /// The planet radius is not a positive finite number.
    InvalidRadius(f64),
    /// The reference axis has zero length or non-finite components.
    InvalidAxis { x: f64, y: f64, z: f64 },
    /// The anchor point has non-finite coordinates.
    InvalidAnchor { lon: f64, lat: f64 },
}

impl fmt::Display for ProjectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRadius(radius) => write!(f, "invalid planet radius {radius}"),
            Self::InvalidAxis { x, y, z } => {
                write!(f, "reference axis ({x}, {y}, {z}) cannot be normalized")
            }
            Self::InvalidAnchor { lon, lat } => {
                write!(f, "anchor ({lon}, {lat}) is not a finite coordinate")
            }
        }
    }
}

impl std::error::Error for ProjectorError {}

/// Errors raised while converting GeoJSON into a feature collection.
#[derive(Debug)]
pub enum ImportError {
    /// The document is not valid GeoJSON.
    Parse(String),
    /// A position has fewer than two values.
    Position {
        /// Index of the offending feature.
        feature: usize,
        /// Number of values found.
        len: usize,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid geojson: {message}"),
            Self::Position { feature, len } => write!(
                f,
                "feature {feature} has a position with {len} values, expected at least 2"
            ),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<geojson::Error> for ImportError {
    fn from(e: geojson::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Errors raised while loading a map configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(PathBuf, std::io::Error),
    /// The file is not valid TOML for [`crate::MapConfig`].
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "failed to read {}: {e}", path.display()),
            Self::Parse(message) => write!(f, "failed to parse config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, e) => Some(e),
            Self::Parse(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
