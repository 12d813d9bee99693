//! Extrusion of planar shapes into solids in the local frame.
//!
//! Extrusion happens in a mixed working space: x and y are longitude and
//! latitude in degrees, z is meters above the extrusion base. Only after the
//! prism is complete is every vertex pushed through the projector, so walls
//! follow the local vertical wherever they stand on the sphere.

use glam::{DVec2, DVec3};

use crate::error::{GeometryError, GeometryResult};
use crate::geo::GeographicPoint;
use crate::mesh::{FaceGroup, FaceSlot, Solid, Surface};
use crate::projector::Projector;
use crate::shape::{Ring, Shape};

/// Extrude `shape` between `min_height` and `height` meters and project the
/// result into the local frame.
pub fn extrude(
    projector: &Projector,
    shape: &Shape,
    height: f64,
    min_height: f64,
) -> GeometryResult<Solid> {
    // Written so that NaN also lands here.
    if !(height >= min_height) {
        return Err(GeometryError::InvertedHeight { height, min_height });
    }
    let mut solid = extrude_prism(shape, height - min_height)?;
    reproject(projector, &mut solid.positions, min_height);
    Ok(solid)
}

/// Triangulate `shape` as a flat surface on the ground.
pub fn flatten(projector: &Projector, shape: &Shape) -> GeometryResult<Surface> {
    let rings = prepare_rings(shape)?;
    let triangles = triangulate(&rings)?;

    let mut positions: Vec<DVec3> = rings
        .iter()
        .flatten()
        .map(|p| DVec3::new(p.x, p.y, 0.0))
        .collect();
    reproject(projector, &mut positions, 0.0);

    Ok(Surface {
        positions,
        indices: triangles.into_iter().flatten().collect(),
    })
}

/// Build the prism of `shape` in working space, spanning `z = 0..=depth`.
///
/// Caps come first in the index buffer (bottom then top), followed by one
/// quad per ring edge. Each wall quad has its own four vertices so that
/// walls stay flat-shaded.
pub fn extrude_prism(shape: &Shape, depth: f64) -> GeometryResult<Solid> {
    let rings = prepare_rings(shape)?;
    let triangles = triangulate(&rings)?;

    let cap_vertices: Vec<DVec2> = rings.iter().flatten().copied().collect();
    let n = to_index(cap_vertices.len());
    let wall_vertices: usize = rings.iter().map(|r| r.len() * 4).sum();

    let mut positions = Vec::with_capacity(cap_vertices.len() * 2 + wall_vertices);
    positions.extend(cap_vertices.iter().map(|p| DVec3::new(p.x, p.y, 0.0)));
    positions.extend(cap_vertices.iter().map(|p| DVec3::new(p.x, p.y, depth)));

    let mut indices = Vec::with_capacity(triangles.len() * 6 + wall_vertices / 4 * 6);

    // Bottom cap faces down, top cap faces up.
    for [a, b, c] in &triangles {
        indices.extend([*a, *c, *b]);
    }
    for [a, b, c] in &triangles {
        indices.extend([a + n, b + n, c + n]);
    }
    let cap_count = indices.len();

    for ring in &rings {
        for (i, &p0) in ring.iter().enumerate() {
            let p1 = ring[(i + 1) % ring.len()];
            let base = to_index(positions.len());
            positions.extend([
                DVec3::new(p0.x, p0.y, 0.0),
                DVec3::new(p1.x, p1.y, 0.0),
                DVec3::new(p1.x, p1.y, depth),
                DVec3::new(p0.x, p0.y, depth),
            ]);
            indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    let groups = vec![
        FaceGroup {
            start: 0,
            count: cap_count,
            slot: FaceSlot::Cap,
        },
        FaceGroup {
            start: cap_count,
            count: indices.len() - cap_count,
            slot: FaceSlot::Side,
        },
    ];

    Ok(Solid {
        positions,
        indices,
        groups,
    })
}

/// Replace working-space vertices `(lon, lat, z)` with local-frame points at
/// altitude `z + base`.
pub fn reproject(projector: &Projector, positions: &mut [DVec3], base: f64) {
    for p in positions {
        *p = projector.to_local(GeographicPoint::new(p.x, p.y, p.z + base));
    }
}

/// Clean and orient the rings of a shape.
///
/// Repeated points and the closing point are dropped. The outer ring is made
/// counter-clockwise and holes clockwise, so caps and walls face outwards.
/// Holes with fewer than three points are dropped.
fn prepare_rings(shape: &Shape) -> GeometryResult<Vec<Ring>> {
    let mut outer = clean_ring(&shape.outer);
    if outer.len() < 3 {
        return Err(GeometryError::DegenerateRing {
            ring: 0,
            points: outer.len(),
        });
    }
    if signed_area(&outer) < 0.0 {
        outer.reverse();
    }

    let mut rings = Vec::with_capacity(1 + shape.holes.len());
    rings.push(outer);
    for (i, hole) in shape.holes.iter().enumerate() {
        let mut hole = clean_ring(hole);
        if hole.len() < 3 {
            tracing::debug!(ring = i + 1, points = hole.len(), "dropping degenerate hole");
            continue;
        }
        if signed_area(&hole) > 0.0 {
            hole.reverse();
        }
        rings.push(hole);
    }
    Ok(rings)
}

fn clean_ring(ring: &[DVec2]) -> Ring {
    let mut points: Ring = Vec::with_capacity(ring.len());
    for &p in ring {
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Shoelace area; positive for counter-clockwise rings.
fn signed_area(ring: &[DVec2]) -> f64 {
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

/// Triangulate the outer ring with its holes as cavities.
///
/// Indices refer to the rings flattened in order. Every triangle is returned
/// counter-clockwise.
fn triangulate(rings: &[Ring]) -> GeometryResult<Vec<[u32; 3]>> {
    let vertices: Vec<DVec2> = rings.iter().flatten().copied().collect();
    let data: Vec<f64> = vertices.iter().flat_map(|p| [p.x, p.y]).collect();

    let mut hole_starts = Vec::with_capacity(rings.len().saturating_sub(1));
    let mut offset = rings[0].len();
    for hole in &rings[1..] {
        hole_starts.push(offset);
        offset += hole.len();
    }

    let flat = earcutr::earcut(&data, &hole_starts, 2)
        .map_err(|e| GeometryError::Triangulation(format!("{e:?}")))?;
    if flat.is_empty() {
        return Err(GeometryError::Triangulation(format!(
            "no triangles for {} vertices",
            vertices.len()
        )));
    }

    Ok(flat
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (t[0], t[1], t[2]);
            let area = (vertices[b] - vertices[a]).perp_dot(vertices[c] - vertices[a]);
            if area < 0.0 {
                [to_index(a), to_index(c), to_index(b)]
            } else {
                [to_index(a), to_index(b), to_index(c)]
            }
        })
        .collect())
}

#[allow(clippy::cast_possible_truncation)]
fn to_index(i: usize) -> u32 {
    debug_assert!(u32::try_from(i).is_ok(), "vertex index {i} overflows u32");
    i as u32
}
