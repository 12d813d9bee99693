//! A 10° longitude/latitude grid for orientation overlays.

use glam::DVec2;

const EPSILON: f64 = 1e-6;

/// Spacing between samples along each grid line, in degrees.
const PRECISION: f64 = 2.5;

/// Grid lines of a 10° graticule as (longitude, latitude) polylines.
///
/// Major meridians every 90° run pole to pole and the equator is the only
/// major parallel. Minor meridians every 10° stop at ±80°; minor parallels
/// cover ±80° in 10° steps. Lines on a major position are not repeated.
#[must_use]
pub fn graticule10() -> Vec<Vec<DVec2>> {
    let (minor_x, minor_y, minor_step): (f64, f64, f64) = (180.0, 80.0, 10.0);
    let (major_x, major_y): (f64, f64) = (180.0, 90.0);
    let (major_dx, major_dy): (f64, f64) = (90.0, 360.0);

    let meridian = |y0: f64, y1: f64| {
        move |x: f64| -> Vec<DVec2> {
            samples(y0, y1).into_iter().map(|y| DVec2::new(x, y)).collect()
        }
    };
    let parallel = |x0: f64, x1: f64| {
        move |y: f64| -> Vec<DVec2> {
            samples(x0, x1).into_iter().map(|x| DVec2::new(x, y)).collect()
        }
    };

    let on_major = |value: f64, step: f64| (value % step).abs() <= EPSILON;

    let mut lines = Vec::new();
    lines.extend(
        range((-major_x / major_dx).ceil() * major_dx, major_x, major_dx)
            .into_iter()
            .map(meridian(-major_y, major_y)),
    );
    lines.extend(
        range((-major_y / major_dy).ceil() * major_dy, major_y, major_dy)
            .into_iter()
            .map(parallel(-major_x, major_x)),
    );
    lines.extend(
        range((-minor_x / minor_step).ceil() * minor_step, minor_x, minor_step)
            .into_iter()
            .filter(|&x| !on_major(x, major_dx))
            .map(meridian(-minor_y, minor_y)),
    );
    lines.extend(
        range(
            (-minor_y / minor_step).ceil() * minor_step,
            minor_y + EPSILON,
            minor_step,
        )
        .into_iter()
        .filter(|&y| !on_major(y, major_dy))
        .map(parallel(-major_x, major_x)),
    );
    lines
}

/// `start, start + step, ..` strictly below `stop`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Samples from `from` to `to` inclusive, `PRECISION` apart.
fn samples(from: f64, to: f64) -> Vec<f64> {
    let mut values = range(from, to - EPSILON, PRECISION);
    values.push(to);
    values
}
