//! Turn tagged geographic features into 3D geometry in a local frame.
//!
//! Input is a collection of polygons and line strings in longitude/latitude
//! degrees, each with an optional set of tags. Output is three groups of
//! meshes (buildings, natural areas and line features) in a Cartesian frame
//! whose origin sits at a chosen anchor point and whose "up" follows a
//! reference axis.
//!
//! # Design principles
//!
//! - **Explicit projector**: the anchor and its rotation live in an immutable
//!   [`Projector`] passed to every stage
//! - **Extrude, then project**: prisms are built in degree/meter working space
//!   and re-projected so walls follow the local vertical
//! - **Skip and continue**: a malformed feature is reported, never fatal to
//!   the pass
//!
//! # Example
//!
//! ```ignore
//! use geoform::{FeatureCollection, MapBuilder, MapConfig};
//!
//! let projector = MapConfig::default().projector()?;
//! let features: FeatureCollection = std::fs::read_to_string("boston.geo.json")?.parse()?;
//! let groups = MapBuilder::new(&projector).build(&features);
//! println!("{} buildings", groups.buildings.len());
//! ```

pub mod builder;
pub mod color;
pub mod config;
mod error;
pub mod extrude;
pub mod feature;
pub mod geo;
pub mod graticule;
pub mod lines;
pub mod material;
pub mod mesh;
pub mod projector;
pub mod shape;
pub mod tags;

pub use builder::{
    BuildReport, FeatureFailure, Group, MapBuilder, MapGroups, Materials, MeshFeature,
    MeshGeometry,
};
pub use color::Rgb;
pub use config::MapConfig;
pub use error::{ConfigError, GeometryError, GeometryResult, ImportError, ProjectorError};
pub use feature::{Feature, FeatureCollection, Geometry};
pub use geo::{EARTH_RADIUS, GeographicPoint};
pub use material::Material;
pub use mesh::{Bounds, FaceGroup, FaceSlot, LineSegments, Solid, Surface};
pub use projector::Projector;
pub use shape::{Ring, Shape};
pub use tags::{TagValue, Tags};
