//! Map materials as Bevy `StandardMaterial`s.

use bevy::prelude::*;
use geoform::Material as MapMaterial;

/// Convert a map material to a PBR material.
pub fn standard_material(material: &MapMaterial) -> StandardMaterial {
    let [r, g, b] = material.base_color().to_array();
    StandardMaterial {
        base_color: Color::srgb(r, g, b),
        perceptual_roughness: material.roughness(),
        metallic: material.metalness(),
        reflectance: material.reflectivity(),
        clearcoat: material.clearcoat(),
        unlit: material.is_unlit(),
        ..default()
    }
}

/// Deduplicates material assets within one spawn pass.
#[derive(Default)]
pub(crate) struct MaterialCache {
    entries: Vec<(MapMaterial, Handle<StandardMaterial>)>,
}

impl MaterialCache {
    pub(crate) fn get_or_add(
        &mut self,
        material: MapMaterial,
        assets: &mut Assets<StandardMaterial>,
    ) -> Handle<StandardMaterial> {
        if let Some((_, handle)) = self.entries.iter().find(|(m, _)| *m == material) {
            return handle.clone();
        }
        let handle = assets.add(standard_material(&material));
        self.entries.push((material, handle.clone()));
        handle
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoform::Rgb;

    #[test]
    fn test_glass_has_clearcoat() {
        let glass = standard_material(&MapMaterial::Glass);
        assert!(glass.clearcoat > 0.0);
        assert!(glass.perceptual_roughness < 0.2);
        assert!(!glass.unlit);
    }

    #[test]
    fn test_lines_are_unlit() {
        let line = standard_material(&MapMaterial::line());
        assert!(line.unlit);
    }

    #[test]
    fn test_flat_colour() {
        let red = standard_material(&MapMaterial::Flat(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!(red.base_color, Color::srgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_cache_reuses_handles() {
        let mut assets = Assets::<StandardMaterial>::default();
        let mut cache = MaterialCache::default();
        let a = cache.get_or_add(MapMaterial::Stone, &mut assets);
        let b = cache.get_or_add(MapMaterial::Stone, &mut assets);
        let c = cache.get_or_add(MapMaterial::Water, &mut assets);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(cache.len(), 2);
    }
}
