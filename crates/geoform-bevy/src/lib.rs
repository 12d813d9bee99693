//! Bevy integration for geoform map groups.
//!
//! Converts generated solids, surfaces and line work into Bevy meshes and
//! `StandardMaterial`s and spawns them as three named entity hierarchies.
//!
//! Maps can be spawned directly with [`spawn_map_groups`], or handed to
//! [`GeoformPlugin`] through the [`PendingMap`] resource. The plugin replaces
//! any previously spawned map, so a reload never leaves stale geometry behind.

mod material;
mod mesh;
mod spawn;

use bevy::prelude::*;
use geoform::MapGroups;

pub use material::standard_material;
pub use mesh::{line_mesh, solid_meshes, surface_mesh};
pub use spawn::{FeatureTags, MapGroupEntities, spawn_map_groups};

/// Plugin that spawns maps submitted through [`PendingMap`].
pub struct GeoformPlugin;

impl Plugin for GeoformPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, spawn_pending_map);
    }
}

/// A freshly built map waiting to be spawned.
#[derive(Resource, Debug)]
pub struct PendingMap(pub MapGroups);

/// Group parents of the map currently in the world.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnedMap(pub MapGroupEntities);

fn spawn_pending_map(
    mut commands: Commands,
    pending: Option<Res<PendingMap>>,
    spawned: Option<Res<SpawnedMap>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(pending) = pending else {
        return;
    };

    if let Some(previous) = spawned {
        for entity in previous.0.iter() {
            commands.entity(entity).despawn();
        }
        tracing::debug!("despawned previous map");
    }

    let entities = spawn_map_groups(&mut commands, &mut meshes, &mut materials, &pending.0);
    commands.remove_resource::<PendingMap>();
    commands.insert_resource(SpawnedMap(entities));
    tracing::info!(
        buildings = pending.0.buildings.len(),
        natural_areas = pending.0.natural_areas.len(),
        line_features = pending.0.line_features.len(),
        "spawned map"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .add_plugins(GeoformPlugin);
        app
    }

    #[test]
    fn test_idle_without_pending_map() {
        let mut app = app();
        app.update();
        assert!(app.world().get_resource::<SpawnedMap>().is_none());
    }

    #[test]
    fn test_reload_replaces_previous_map() {
        let mut app = app();
        app.insert_resource(PendingMap(MapGroups::default()));
        app.update();

        assert!(app.world().get_resource::<PendingMap>().is_none());
        let first = app.world().resource::<SpawnedMap>().0;

        app.insert_resource(PendingMap(MapGroups::default()));
        app.update();

        let second = app.world().resource::<SpawnedMap>().0;
        assert_ne!(first, second);
        for entity in first.iter() {
            assert!(app.world().get_entity(entity).is_err());
        }
        for entity in second.iter() {
            assert!(app.world().get_entity(entity).is_ok());
        }
    }
}
