//! Containers for generated geometry.
//!
//! Positions are in the local map frame (meters) once they leave the
//! extruder; indices describe a triangle list.

use glam::DVec3;
use serde::Serialize;

/// Which material slot a run of triangles uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceSlot {
    /// Top and bottom caps (roof material).
    Cap,
    /// Side walls (wall material).
    Side,
}

/// A contiguous run of indices sharing one material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceGroup {
    /// Offset into the index buffer.
    pub start: usize,
    /// Number of indices (a multiple of 3).
    pub count: usize,
    pub slot: FaceSlot,
}

/// A closed extruded solid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Solid {
    pub positions: Vec<DVec3>,
    pub indices: Vec<u32>,
    pub groups: Vec<FaceGroup>,
}

/// A flat triangulated surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Surface {
    pub positions: Vec<DVec3>,
    pub indices: Vec<u32>,
}

/// Unconnected line segments; positions are consumed in pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineSegments {
    pub positions: Vec<DVec3>,
}

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    /// Bounds of `points`, or `None` if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.min(*p),
            max: b.max.max(*p),
        }))
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

impl Solid {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Indices belonging to one material slot.
    pub fn slot_indices(&self, slot: FaceSlot) -> impl Iterator<Item = u32> + '_ {
        self.groups
            .iter()
            .filter(move |g| g.slot == slot)
            .flat_map(|g| self.indices[g.start..g.start + g.count].iter().copied())
    }

    #[must_use]
    pub fn vertex_normals(&self) -> Vec<DVec3> {
        vertex_normals(&self.positions, &self.indices)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.positions)
    }
}

impl Surface {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_normals(&self) -> Vec<DVec3> {
        vertex_normals(&self.positions, &self.indices)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.positions)
    }
}

impl LineSegments {
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn segments(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        self.positions.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.positions)
    }
}

/// Area-weighted per-vertex normals for a triangle list.
fn vertex_normals(positions: &[DVec3], indices: &[u32]) -> Vec<DVec3> {
    let mut normals = vec![DVec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        // Cross product length is twice the triangle area.
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let points = [
            DVec3::new(1.0, -2.0, 3.0),
            DVec3::new(-1.0, 4.0, 0.0),
            DVec3::new(0.0, 0.0, 5.0),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, DVec3::new(1.0, 4.0, 5.0));
        assert_eq!(bounds.size(), DVec3::new(2.0, 6.0, 5.0));
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_vertex_normals_of_quad() {
        let surface = Surface {
            positions: vec![
                DVec3::ZERO,
                DVec3::X,
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::Y,
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        for n in surface.vertex_normals() {
            assert!((n - DVec3::Z).length() < 1e-12);
        }
    }

    #[test]
    fn test_slot_indices() {
        let solid = Solid {
            positions: vec![DVec3::ZERO; 4],
            indices: vec![0, 1, 2, 1, 2, 3],
            groups: vec![
                FaceGroup {
                    start: 0,
                    count: 3,
                    slot: FaceSlot::Cap,
                },
                FaceGroup {
                    start: 3,
                    count: 3,
                    slot: FaceSlot::Side,
                },
            ],
        };
        assert_eq!(solid.slot_indices(FaceSlot::Side).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(solid.triangle_count(), 2);
    }

    #[test]
    fn test_segments() {
        let lines = LineSegments {
            positions: vec![DVec3::ZERO, DVec3::X, DVec3::X, DVec3::Y],
        };
        assert_eq!(lines.segment_count(), 2);
        assert_eq!(lines.segments().nth(1), Some((DVec3::X, DVec3::Y)));
    }
}
