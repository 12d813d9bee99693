//! Mesh conversion utilities for rendering geoform geometry in Bevy.
//!
//! Converts double-precision local-frame geometry to Bevy's single-precision
//! mesh format. Local coordinates stay within a few kilometers of the anchor,
//! so `f32` keeps centimeter precision.

use std::collections::HashMap;

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use geoform::{FaceSlot, LineSegments, Solid, Surface};
use glam::DVec3;

/// Convert a solid to one mesh per material slot.
///
/// Each mesh only carries the vertices its triangles reference.
pub fn solid_meshes(solid: &Solid) -> Vec<(FaceSlot, Mesh)> {
    let normals = solid.vertex_normals();
    [FaceSlot::Cap, FaceSlot::Side]
        .into_iter()
        .filter_map(|slot| {
            let indices: Vec<u32> = solid.slot_indices(slot).collect();
            if indices.is_empty() {
                return None;
            }
            Some((slot, triangle_mesh(&solid.positions, &normals, &indices)))
        })
        .collect()
}

pub fn surface_mesh(surface: &Surface) -> Mesh {
    triangle_mesh(
        &surface.positions,
        &surface.vertex_normals(),
        &surface.indices,
    )
}

/// Convert line segments to a `LineList` mesh.
pub fn line_mesh(lines: &LineSegments) -> Mesh {
    let positions: Vec<[f32; 3]> = lines.positions.iter().map(|p| to_f32(*p)).collect();
    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

#[allow(clippy::cast_possible_truncation)]
fn triangle_mesh(positions: &[DVec3], normals: &[DVec3], indices: &[u32]) -> Mesh {
    // Compact the vertex buffers to the referenced vertices.
    let mut remap: HashMap<u32, u32> = HashMap::with_capacity(indices.len());
    let mut out_positions: Vec<[f32; 3]> = Vec::new();
    let mut out_normals: Vec<[f32; 3]> = Vec::new();
    let mut out_indices = Vec::with_capacity(indices.len());

    for &index in indices {
        let next = out_positions.len() as u32;
        let mapped = *remap.entry(index).or_insert(next);
        if mapped == next {
            out_positions.push(to_f32(positions[index as usize]));
            out_normals.push(to_f32(normals[index as usize]));
        }
        out_indices.push(mapped);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, out_positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, out_normals);
    mesh.insert_indices(Indices::U32(out_indices));
    mesh
}

fn to_f32(v: DVec3) -> [f32; 3] {
    v.as_vec3().to_array()
}
