//! Line work projected onto the ground.

use glam::DVec2;

use crate::geo::GeographicPoint;
use crate::mesh::LineSegments;
use crate::projector::Projector;
use crate::shape::Ring;

/// Project a polyline and connect consecutive points pairwise.
#[must_use]
pub fn line_string(projector: &Projector, coords: &[DVec2]) -> LineSegments {
    let mut lines = LineSegments::default();
    push_polyline(projector, coords, 0.0, &mut lines);
    lines
}

/// Outline every ring of a polygon, holes included.
///
/// Rings are drawn as given; an unclosed ring stays open.
#[must_use]
pub fn polygon_outline(projector: &Projector, rings: &[Ring]) -> LineSegments {
    polygon_outline_at(projector, rings, 0.0)
}

/// Like [`polygon_outline`], lifted `altitude` meters off the ground.
#[must_use]
pub fn polygon_outline_at(projector: &Projector, rings: &[Ring], altitude: f64) -> LineSegments {
    let mut lines = LineSegments::default();
    for ring in rings {
        push_polyline(projector, ring, altitude, &mut lines);
    }
    lines
}

#[must_use]
pub fn multi_line_string(projector: &Projector, polylines: &[Vec<DVec2>]) -> LineSegments {
    let mut lines = LineSegments::default();
    for polyline in polylines {
        push_polyline(projector, polyline, 0.0, &mut lines);
    }
    lines
}

fn push_polyline(projector: &Projector, coords: &[DVec2], altitude: f64, out: &mut LineSegments) {
    let points: Vec<_> = coords
        .iter()
        .map(|c| projector.to_local(GeographicPoint::new(c.x, c.y, altitude)))
        .collect();
    out.positions.reserve(points.len().saturating_sub(1) * 2);
    for pair in points.windows(2) {
        out.positions.extend([pair[0], pair[1]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn projector() -> Projector {
        Projector::new(GeographicPoint::ground(10.0, 20.0), DVec3::Y).unwrap()
    }

    #[test]
    fn test_line_string_pairs() {
        let coords = [
            DVec2::new(10.0, 20.0),
            DVec2::new(10.001, 20.0),
            DVec2::new(10.001, 20.001),
        ];
        let lines = line_string(&projector(), &coords);
        assert_eq!(lines.segment_count(), 2);
        let (a, b) = lines.segments().next().unwrap();
        assert!(a.length() < 1e-6);
        // Shared endpoint between consecutive segments.
        assert_eq!(b, lines.positions[2]);
    }

    #[test]
    fn test_short_line_string_is_empty() {
        assert_eq!(line_string(&projector(), &[]).segment_count(), 0);
        let single = [DVec2::new(10.0, 20.0)];
        assert_eq!(line_string(&projector(), &single).segment_count(), 0);
    }

    #[test]
    fn test_polygon_outline_covers_holes() {
        let outer = vec![
            DVec2::new(10.0, 20.0),
            DVec2::new(10.01, 20.0),
            DVec2::new(10.01, 20.01),
            DVec2::new(10.0, 20.0),
        ];
        let hole = vec![
            DVec2::new(10.002, 20.001),
            DVec2::new(10.004, 20.001),
            DVec2::new(10.004, 20.003),
            DVec2::new(10.002, 20.001),
        ];
        let lines = polygon_outline(&projector(), &[outer, hole]);
        assert_eq!(lines.segment_count(), 6);
    }

    #[test]
    fn test_lifted_outline() {
        let ring = vec![DVec2::new(10.0, 20.0), DVec2::new(10.0, 20.001)];
        let lines = polygon_outline_at(&projector(), &[ring], 5.0);
        assert!((lines.positions[0] - DVec3::new(0.0, 5.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_multi_line_string_keeps_parts_apart() {
        let parts = vec![
            vec![DVec2::new(10.0, 20.0), DVec2::new(10.001, 20.0)],
            vec![DVec2::new(11.0, 21.0), DVec2::new(11.001, 21.0)],
        ];
        let lines = multi_line_string(&projector(), &parts);
        // No segment bridges the two parts.
        assert_eq!(lines.segment_count(), 2);
    }
}
