//! One pass from a feature collection to renderable groups.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::DVec2;
use serde::{Serialize, Serializer};

use crate::error::{GeometryError, GeometryResult};
use crate::extrude::{extrude, flatten};
use crate::feature::{Feature, FeatureCollection, Geometry};
use crate::lines::{line_string, multi_line_string, polygon_outline};
use crate::material::{
    Material, resolve_building_height, resolve_natural_material, resolve_roof_material,
    resolve_wall_material,
};
use crate::mesh::{Bounds, FaceSlot, LineSegments, Solid, Surface};
use crate::projector::Projector;
use crate::shape::{Ring, build_shape};
use crate::tags::{BUILDING, Tags};

/// The output groups a feature can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Buildings,
    NaturalAreas,
    LineFeatures,
}

impl Group {
    pub const ALL: [Self; 3] = [Self::Buildings, Self::NaturalAreas, Self::LineFeatures];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Buildings => "buildings",
            Self::NaturalAreas => "natural_areas",
            Self::LineFeatures => "line_features",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeshGeometry {
    Solid(Solid),
    Surface(Surface),
    Lines(LineSegments),
}

impl MeshGeometry {
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::Solid(solid) => solid.bounds(),
            Self::Surface(surface) => surface.bounds(),
            Self::Lines(lines) => lines.bounds(),
        }
    }
}

/// Materials attached to a generated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Materials {
    Building { wall: Material, roof: Material },
    Single(Material),
}

impl Materials {
    /// Material for one face slot of a solid.
    #[must_use]
    pub fn for_slot(&self, slot: FaceSlot) -> Material {
        match (self, slot) {
            (Self::Building { roof, .. }, FaceSlot::Cap) => *roof,
            (Self::Building { wall, .. }, FaceSlot::Side) => *wall,
            (Self::Single(material), _) => *material,
        }
    }
}

/// A generated mesh with its materials and source tags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshFeature {
    pub geometry: MeshGeometry,
    pub materials: Materials,
    /// Tags of the originating feature, shared rather than copied.
    pub tags: Option<Arc<Tags>>,
}

/// A feature that matched a group but whose geometry could not be built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureFailure {
    /// Position of the feature in the input collection.
    pub index: usize,
    pub group: Group,
    #[serde(serialize_with = "serialize_display")]
    pub error: GeometryError,
}

/// Diagnostics collected during one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    /// Number of input features visited.
    pub features: usize,
    /// Skipped features by geometry kind.
    pub skipped: BTreeMap<String, usize>,
    pub failures: Vec<FeatureFailure>,
}

impl BuildReport {
    #[must_use]
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Result of one pass. Owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapGroups {
    pub buildings: Vec<MeshFeature>,
    pub natural_areas: Vec<MeshFeature>,
    pub line_features: Vec<MeshFeature>,
    pub report: BuildReport,
}

impl MapGroups {
    #[must_use]
    pub fn group(&self, group: Group) -> &[MeshFeature] {
        match group {
            Group::Buildings => &self.buildings,
            Group::NaturalAreas => &self.natural_areas,
            Group::LineFeatures => &self.line_features,
        }
    }

    fn group_mut(&mut self, group: Group) -> &mut Vec<MeshFeature> {
        match group {
            Group::Buildings => &mut self.buildings,
            Group::NaturalAreas => &mut self.natural_areas,
            Group::LineFeatures => &mut self.line_features,
        }
    }

    /// Bounds over every generated mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Group::ALL
            .iter()
            .flat_map(|&g| self.group(g))
            .filter_map(|m| m.geometry.bounds())
            .reduce(Bounds::union)
    }
}

/// Classifies features and generates their geometry.
#[derive(Debug, Clone, Copy)]
pub struct MapBuilder<'a> {
    projector: &'a Projector,
}

impl<'a> MapBuilder<'a> {
    #[must_use]
    pub fn new(projector: &'a Projector) -> Self {
        Self { projector }
    }

    /// Run one pass over `collection`.
    ///
    /// Features are visited in input order. A feature whose geometry fails is
    /// recorded in the report and the pass continues.
    #[must_use]
    pub fn build(&self, collection: &FeatureCollection) -> MapGroups {
        let mut groups = MapGroups::default();
        for (index, feature) in collection.features.iter().enumerate() {
            self.build_feature(index, feature, &mut groups);
        }
        groups.report.features = collection.len();

        tracing::info!(
            features = groups.report.features,
            buildings = groups.buildings.len(),
            natural_areas = groups.natural_areas.len(),
            line_features = groups.line_features.len(),
            skipped = groups.report.skipped_total(),
            failed = groups.report.failures.len(),
            "built map groups"
        );
        groups
    }

    /// Append extra polylines, such as a graticule, to the line features.
    pub fn add_lines(&self, groups: &mut MapGroups, polylines: &[Vec<DVec2>]) {
        let lines = multi_line_string(self.projector, polylines);
        tracing::debug!(segments = lines.segment_count(), "adding line work");
        groups.line_features.push(MeshFeature {
            geometry: MeshGeometry::Lines(lines),
            materials: Materials::Single(Material::line()),
            tags: None,
        });
    }

    fn build_feature(&self, index: usize, feature: &Feature, groups: &mut MapGroups) {
        match &feature.geometry {
            Geometry::Polygon(rings) => self.polygon(index, rings, feature.tags.as_ref(), groups),
            Geometry::LineString(coords) => {
                groups.line_features.push(MeshFeature {
                    geometry: MeshGeometry::Lines(line_string(self.projector, coords)),
                    materials: Materials::Single(Material::line()),
                    tags: feature.tags.clone(),
                });
            }
            Geometry::Unsupported(kind) => {
                tracing::debug!(index, kind = kind.as_str(), "unsupported geometry");
                *groups.report.skipped.entry(kind.clone()).or_default() += 1;
            }
        }
    }

    fn polygon(
        &self,
        index: usize,
        rings: &[Ring],
        tags: Option<&Arc<Tags>>,
        groups: &mut MapGroups,
    ) {
        let Some(tags) = tags else {
            self.outline(index, rings, None, groups);
            return;
        };

        let is_building = tags.building();
        let natural = tags.natural().is_some();

        if is_building {
            if let Some(kind) = tags.text(BUILDING).filter(|k| *k != "yes") {
                tracing::debug!(index, building = kind, "building subtype");
            }
            let result = self.building(rings, tags);
            record(groups, index, Group::Buildings, result);
        }
        if natural {
            let result = self.natural_area(rings, tags);
            record(groups, index, Group::NaturalAreas, result);
        }
        if !is_building && !natural {
            self.outline(index, rings, Some(tags), groups);
        }
    }

    fn building(&self, rings: &[Ring], tags: &Arc<Tags>) -> GeometryResult<MeshFeature> {
        let (height, min_height) = resolve_building_height(tags);
        let shape = build_shape(rings)?;
        let solid = extrude(self.projector, &shape, height, min_height)?;
        Ok(MeshFeature {
            geometry: MeshGeometry::Solid(solid),
            materials: Materials::Building {
                wall: resolve_wall_material(tags),
                roof: resolve_roof_material(tags),
            },
            tags: Some(Arc::clone(tags)),
        })
    }

    fn natural_area(&self, rings: &[Ring], tags: &Arc<Tags>) -> GeometryResult<MeshFeature> {
        let shape = build_shape(rings)?;
        let surface = flatten(self.projector, &shape)?;
        Ok(MeshFeature {
            geometry: MeshGeometry::Surface(surface),
            materials: Materials::Single(resolve_natural_material(tags)),
            tags: Some(Arc::clone(tags)),
        })
    }

    fn outline(
        &self,
        index: usize,
        rings: &[Ring],
        tags: Option<&Arc<Tags>>,
        groups: &mut MapGroups,
    ) {
        let result = if rings.is_empty() {
            Err(GeometryError::NoRings)
        } else {
            Ok(MeshFeature {
                geometry: MeshGeometry::Lines(polygon_outline(self.projector, rings)),
                materials: Materials::Single(Material::outline()),
                tags: tags.cloned(),
            })
        };
        record(groups, index, Group::LineFeatures, result);
    }
}

fn record(
    groups: &mut MapGroups,
    index: usize,
    group: Group,
    result: GeometryResult<MeshFeature>,
) {
    match result {
        Ok(mesh) => groups.group_mut(group).push(mesh),
        Err(error) => {
            tracing::warn!(index, %group, %error, "skipping feature");
            groups.report.failures.push(FeatureFailure {
                index,
                group,
                error,
            });
        }
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeographicPoint;
    use crate::tags::{BUILDING, HEIGHT, MIN_HEIGHT, NATURAL, ROOF_MATERIAL};
    use glam::DVec3;

    fn projector() -> Projector {
        Projector::new(GeographicPoint::ground(0.0005, 0.0005), DVec3::Y).unwrap()
    }

    fn square() -> Vec<Ring> {
        vec![vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 0.001),
            DVec2::new(0.001, 0.001),
            DVec2::new(0.001, 0.0),
            DVec2::new(0.0, 0.0),
        ]]
    }

    fn polygon(tags: Option<Tags>) -> Feature {
        Feature::new(Geometry::Polygon(square()), tags)
    }

    fn counts(groups: &MapGroups) -> [usize; 3] {
        Group::ALL.map(|g| groups.group(g).len())
    }

    #[test]
    fn test_line_string_only_in_line_features() {
        let line = Feature::new(
            Geometry::LineString(vec![DVec2::ZERO, DVec2::new(0.001, 0.0)]),
            Some(Tags::new()),
        );
        let projector = projector();
        let groups = MapBuilder::new(&projector).build(&FeatureCollection::from_iter([line]));
        assert_eq!(counts(&groups), [0, 0, 1]);
        assert_eq!(
            groups.line_features[0].materials,
            Materials::Single(Material::line())
        );
    }

    #[test]
    fn test_building_and_water() {
        let tags = Tags::new().with(BUILDING, "yes").with(NATURAL, "water");
        let projector = projector();
        let groups = MapBuilder::new(&projector).build(&FeatureCollection::from_iter([polygon(
            Some(tags),
        )]));
        assert_eq!(counts(&groups), [1, 1, 0]);
        assert_eq!(
            groups.natural_areas[0].materials,
            Materials::Single(Material::Water)
        );
        // Both meshes share the same tag allocation.
        let a = groups.buildings[0].tags.as_ref().unwrap();
        let b = groups.natural_areas[0].tags.as_ref().unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_natural_area_has_no_outline() {
        let projector = projector();
        let groups = MapBuilder::new(&projector).build(&FeatureCollection::from_iter([polygon(
            Some(Tags::new().with(NATURAL, "wood")),
        )]));
        assert_eq!(counts(&groups), [0, 1, 0]);
        assert_eq!(
            groups.natural_areas[0].materials,
            Materials::Single(Material::Vegetation)
        );
        assert!(matches!(
            groups.natural_areas[0].geometry,
            MeshGeometry::Surface(_)
        ));
    }

    #[test]
    fn test_building_extent_and_materials() {
        let tags = Tags::new()
            .with(BUILDING, "office")
            .with(HEIGHT, 20.0)
            .with(MIN_HEIGHT, 5.0)
            .with(ROOF_MATERIAL, "glass");
        let projector = projector();
        let groups = MapBuilder::new(&projector).build(&FeatureCollection::from_iter([polygon(
            Some(tags),
        )]));
        let building = &groups.buildings[0];
        let MeshGeometry::Solid(solid) = &building.geometry else {
            panic!("expected a solid");
        };
        let bounds = solid.bounds().unwrap();
        // Near the anchor the reference axis is the vertical.
        assert!((bounds.min.y - 5.0).abs() < 0.1);
        assert!((bounds.max.y - 20.0).abs() < 0.1);
        assert_eq!(building.materials.for_slot(FaceSlot::Cap), Material::Glass);
        assert_eq!(building.materials.for_slot(FaceSlot::Side), Material::Neutral);
    }

    #[test]
    fn test_polygon_fallbacks_become_outlines() {
        let untagged = polygon(None);
        let other = polygon(Some(Tags::new().with("landuse", "grass")));
        let not_building = polygon(Some(Tags::new().with(BUILDING, "no")));
        let projector = projector();
        let groups = MapBuilder::new(&projector).build(&FeatureCollection::from_iter([
            untagged,
            other,
            not_building,
        ]));
        assert_eq!(counts(&groups), [0, 0, 3]);
        for outline in &groups.line_features {
            assert_eq!(outline.materials, Materials::Single(Material::outline()));
            let MeshGeometry::Lines(lines) = &outline.geometry else {
                panic!("expected lines");
            };
            assert_eq!(lines.segment_count(), 4);
        }
        assert!(groups.line_features[0].tags.is_none());
    }

    #[test]
    fn test_skip_and_continue() {
        let projector = projector();
        let collection = FeatureCollection::from_iter([
            Feature::new(Geometry::Polygon(Vec::new()), Some(Tags::new().with(BUILDING, "yes"))),
            Feature::new(Geometry::Unsupported("Point".into()), None),
            Feature::new(Geometry::Unsupported("Point".into()), None),
            Feature::new(Geometry::Unsupported("MultiPolygon".into()), None),
            polygon(Some(Tags::new().with(BUILDING, "yes").with(HEIGHT, 1.0).with(MIN_HEIGHT, 4.0))),
            polygon(Some(Tags::new().with(BUILDING, "yes"))),
        ]);
        let groups = MapBuilder::new(&projector).build(&collection);

        assert_eq!(counts(&groups), [1, 0, 0]);
        let report = &groups.report;
        assert_eq!(report.features, 6);
        assert_eq!(report.skipped.get("Point"), Some(&2));
        assert_eq!(report.skipped.get("MultiPolygon"), Some(&1));
        assert_eq!(report.skipped_total(), 3);
        assert_eq!(
            report.failures,
            vec![
                FeatureFailure {
                    index: 0,
                    group: Group::Buildings,
                    error: GeometryError::NoRings,
                },
                FeatureFailure {
                    index: 4,
                    group: Group::Buildings,
                    error: GeometryError::InvertedHeight {
                        height: 1.0,
                        min_height: 4.0,
                    },
                },
            ]
        );
    }

    #[test]
    fn test_add_lines() {
        let projector = projector();
        let builder = MapBuilder::new(&projector);
        let mut groups = builder.build(&FeatureCollection::default());
        builder.add_lines(
            &mut groups,
            &[vec![DVec2::ZERO, DVec2::new(0.0, 0.001), DVec2::new(0.001, 0.001)]],
        );
        assert_eq!(counts(&groups), [0, 0, 1]);
        assert!(groups.bounds().is_some());
    }

    #[test]
    fn test_report_serializes_errors_as_text() {
        let failure = FeatureFailure {
            index: 3,
            group: Group::NaturalAreas,
            error: GeometryError::NoRings,
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["group"], "natural_areas");
        assert_eq!(json["error"], "polygon has no rings");
    }
}
