//! Input feature model and GeoJSON ingestion.

use std::str::FromStr;
use std::sync::Arc;

use geojson::GeoJson;
use glam::DVec2;

use crate::error::ImportError;
use crate::shape::Ring;
use crate::tags::Tags;

/// Geometry of one input feature, in (longitude, latitude) degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Rings in source order: outer boundary first, then holes.
    Polygon(Vec<Ring>),
    LineString(Vec<DVec2>),
    /// Any other geometry kind, by GeoJSON type name.
    Unsupported(String),
}

impl Geometry {
    /// GeoJSON type name of the geometry.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Polygon(_) => "Polygon",
            Self::LineString(_) => "LineString",
            Self::Unsupported(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    /// Tag mapping, shared with every mesh generated from this feature.
    pub tags: Option<Arc<Tags>>,
}

impl Feature {
    #[must_use]
    pub fn new(geometry: Geometry, tags: Option<Tags>) -> Self {
        Self {
            geometry,
            tags: tags.map(Arc::new),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Convert a parsed GeoJSON document.
    ///
    /// A bare feature or geometry becomes a one-feature collection.
    pub fn from_geojson(geojson: GeoJson) -> Result<Self, ImportError> {
        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(g) => vec![geojson::Feature {
                bbox: None,
                geometry: Some(g),
                id: None,
                properties: None,
                foreign_members: None,
            }],
        };

        let features = features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| convert_feature(index, feature))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(features = features.len(), "converted geojson");
        Ok(Self { features })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromStr for FeatureCollection {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_geojson(s.parse::<GeoJson>()?)
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

fn convert_feature(index: usize, feature: geojson::Feature) -> Result<Feature, ImportError> {
    let tags = feature.properties.as_ref().map(Tags::from_json_object);
    let geometry = match feature.geometry {
        Some(geometry) => convert_geometry(index, &geometry.value)?,
        None => Geometry::Unsupported("null".to_owned()),
    };
    Ok(Feature::new(geometry, tags))
}

fn convert_geometry(index: usize, value: &geojson::Value) -> Result<Geometry, ImportError> {
    use geojson::Value;

    let kind = match value {
        Value::Polygon(rings) => {
            let rings = rings
                .iter()
                .map(|ring| convert_line(index, ring))
                .collect::<Result<_, _>>()?;
            return Ok(Geometry::Polygon(rings));
        }
        Value::LineString(coords) => return Ok(Geometry::LineString(convert_line(index, coords)?)),
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::MultiLineString(_) => "MultiLineString",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    };
    Ok(Geometry::Unsupported(kind.to_owned()))
}

fn convert_line(index: usize, positions: &[Vec<f64>]) -> Result<Vec<DVec2>, ImportError> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Ok(DVec2::new(*lon, *lat)),
            _ => Err(ImportError::Position {
                feature: index,
                len: p.len(),
            }),
        })
        .collect()
}
