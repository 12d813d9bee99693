//! Spawning map groups as entity hierarchies.
//!
//! Each group becomes a named parent entity. Every generated feature becomes
//! a child carrying its source tags, with one mesh entity per material below.

use std::sync::Arc;

use bevy::prelude::*;
use geoform::{FaceSlot, Group, MapGroups, Material as MapMaterial, MeshFeature, MeshGeometry, Tags};

use crate::material::MaterialCache;
use crate::mesh::{line_mesh, solid_meshes, surface_mesh};

/// Source tags of a spawned feature, for picking and inspection.
#[derive(Component, Debug, Clone)]
pub struct FeatureTags(pub Arc<Tags>);

/// Parent entities of the three spawned groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapGroupEntities {
    pub buildings: Entity,
    pub natural_areas: Entity,
    pub line_features: Entity,
}

impl MapGroupEntities {
    pub fn iter(&self) -> impl Iterator<Item = Entity> {
        [self.buildings, self.natural_areas, self.line_features].into_iter()
    }
}

/// Spawn every group of `groups` and return the group parents.
pub fn spawn_map_groups(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    groups: &MapGroups,
) -> MapGroupEntities {
    let mut cache = MaterialCache::default();
    let [buildings, natural_areas, line_features] = Group::ALL.map(|group| {
        spawn_group(
            commands,
            meshes,
            materials,
            &mut cache,
            group,
            groups.group(group),
        )
    });
    MapGroupEntities {
        buildings,
        natural_areas,
        line_features,
    }
}

fn spawn_group(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    cache: &mut MaterialCache,
    group: Group,
    features: &[MeshFeature],
) -> Entity {
    let parent = commands
        .spawn((Name::new(group.name()), Transform::default(), Visibility::default()))
        .id();

    for (i, feature) in features.iter().enumerate() {
        let mut entity = commands.spawn((
            Name::new(format!("{group} {i}")),
            Transform::default(),
            Visibility::default(),
            ChildOf(parent),
        ));
        if let Some(tags) = &feature.tags {
            entity.insert(FeatureTags(Arc::clone(tags)));
        }
        let feature_entity = entity.id();

        for (mesh, material) in feature_meshes(feature) {
            commands.spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(cache.get_or_add(material, materials)),
                Transform::default(),
                ChildOf(feature_entity),
            ));
        }
    }

    tracing::debug!(group = group.name(), features = features.len(), "spawned map group");
    parent
}

fn feature_meshes(feature: &MeshFeature) -> Vec<(Mesh, MapMaterial)> {
    match &feature.geometry {
        MeshGeometry::Solid(solid) => solid_meshes(solid)
            .into_iter()
            .map(|(slot, mesh)| (mesh, feature.materials.for_slot(slot)))
            .collect(),
        MeshGeometry::Surface(surface) => vec![(
            surface_mesh(surface),
            feature.materials.for_slot(FaceSlot::Cap),
        )],
        MeshGeometry::Lines(lines) => {
            vec![(line_mesh(lines), feature.materials.for_slot(FaceSlot::Side))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use geoform::tags::{BUILDING, NATURAL};
    use geoform::{Feature, FeatureCollection, GeographicPoint, Geometry, MapBuilder, Projector};
    use glam::{DVec2, DVec3};

    fn groups() -> MapGroups {
        let square = vec![vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.001, 0.0),
            DVec2::new(0.001, 0.001),
            DVec2::new(0.0, 0.001),
        ]];
        let collection = FeatureCollection::from_iter([
            Feature::new(
                Geometry::Polygon(square.clone()),
                Some(Tags::new().with(BUILDING, "yes").with(NATURAL, "water")),
            ),
            Feature::new(Geometry::Polygon(square), None),
            Feature::new(
                Geometry::LineString(vec![DVec2::ZERO, DVec2::new(0.0, 0.001)]),
                None,
            ),
        ]);
        let projector = Projector::new(GeographicPoint::ground(0.0, 0.0), DVec3::Y).unwrap();
        MapBuilder::new(&projector).build(&collection)
    }

    fn children(world: &World, entity: Entity) -> Vec<Entity> {
        world
            .entity(entity)
            .get::<Children>()
            .map(|c| c.to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_spawn_hierarchy() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();

        let groups = groups();
        let entities = world
            .run_system_once(
                move |mut commands: Commands,
                      mut meshes: ResMut<Assets<Mesh>>,
                      mut materials: ResMut<Assets<StandardMaterial>>| {
                    spawn_map_groups(&mut commands, &mut meshes, &mut materials, &groups)
                },
            )
            .unwrap();

        let name = world.entity(entities.buildings).get::<Name>().unwrap();
        assert_eq!(name.as_str(), "buildings");

        let buildings = children(&world, entities.buildings);
        assert_eq!(buildings.len(), 1);
        assert!(world.entity(buildings[0]).contains::<FeatureTags>());
        // Roof and wall meshes.
        assert_eq!(children(&world, buildings[0]).len(), 2);

        assert_eq!(children(&world, entities.natural_areas).len(), 1);

        // Untagged outline plus the line string.
        let lines = children(&world, entities.line_features);
        assert_eq!(lines.len(), 2);
        assert!(!world.entity(lines[0]).contains::<FeatureTags>());

        // Untagged roof and wall share the neutral material.
        assert_eq!(world.resource::<Assets<StandardMaterial>>().len(), 4);
    }
}
