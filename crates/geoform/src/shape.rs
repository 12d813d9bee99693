//! Assembly of polygon rings into a planar shape.

use glam::DVec2;
use serde::Serialize;

use crate::error::{GeometryError, GeometryResult};

/// Ordered (longitude, latitude) coordinates of one ring.
pub type Ring = Vec<DVec2>;

/// A planar outline with zero or more holes, in degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

impl Shape {
    /// Iterate over the outer ring followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(&self.holes)
    }
}

/// Build a shape from rings in source order.
///
/// The first ring becomes the outer boundary and every later ring a hole.
/// Closure, winding and self-intersection are not checked here.
pub fn build_shape(rings: &[Ring]) -> GeometryResult<Shape> {
    let (outer, holes) = rings.split_first().ok_or(GeometryError::NoRings)?;
    Ok(Shape {
        outer: outer.clone(),
        holes: holes.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Ring {
        vec![
            DVec2::new(x, y),
            DVec2::new(x, y + size),
            DVec2::new(x + size, y + size),
            DVec2::new(x + size, y),
            DVec2::new(x, y),
        ]
    }

    #[test]
    fn test_empty_is_error() {
        assert_eq!(build_shape(&[]), Err(GeometryError::NoRings));
    }

    #[test]
    fn test_single_ring() {
        let shape = build_shape(&[square(0.0, 0.0, 1.0)]).unwrap();
        assert_eq!(shape.outer, square(0.0, 0.0, 1.0));
        assert!(shape.holes.is_empty());
    }

    #[test]
    fn test_holes_follow_source_order() {
        let rings = [
            square(0.0, 0.0, 10.0),
            square(1.0, 1.0, 2.0),
            square(5.0, 5.0, 2.0),
        ];
        let shape = build_shape(&rings).unwrap();
        assert_eq!(shape.outer, rings[0]);
        assert_eq!(shape.holes, vec![rings[1].clone(), rings[2].clone()]);
        assert_eq!(shape.rings().count(), 3);
    }

    #[test]
    fn test_position_decides_role() {
        // A small first ring stays the outer boundary.
        let rings = [square(1.0, 1.0, 2.0), square(0.0, 0.0, 10.0)];
        let shape = build_shape(&rings).unwrap();
        assert_eq!(shape.outer, rings[0]);
        assert_eq!(shape.holes.len(), 1);
    }
}
