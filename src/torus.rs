/*
 * Torus Module
 *
 * Geometry on the wraparound plane [-1, 1) x [-1, 1). Leaving one edge
 * re-enters at the opposite edge, so every distance and bearing between
 * agents must be measured along the shortest wrapped path.
 */

use std::f64::consts::{PI, TAU};

use glam::DVec2;

use crate::{DOMAIN_MAX, DOMAIN_MIN, DOMAIN_WIDTH};

// Wrap one coordinate into [DOMAIN_MIN, DOMAIN_MAX)
#[inline]
pub fn wrap_coord(value: f64) -> f64 {
    let wrapped = (value - DOMAIN_MIN).rem_euclid(DOMAIN_WIDTH) + DOMAIN_MIN;
    // rem_euclid may round up to exactly the width
    if wrapped >= DOMAIN_MAX {
        DOMAIN_MIN
    } else {
        wrapped
    }
}

/// Wraps a point into the domain.
#[inline]
pub fn wrap_point(point: DVec2) -> DVec2 {
    DVec2::new(wrap_coord(point.x), wrap_coord(point.y))
}

// Wrap a raw per-axis difference into [-1, 1]
#[inline]
fn wrap_axis_delta(delta: f64) -> f64 {
    delta - DOMAIN_WIDTH * (delta / DOMAIN_WIDTH).round()
}

/// Shortest displacement from `a` to `b` on the torus.
///
/// Each axis is wrapped independently, so a raw difference of -1.9 becomes
/// 0.1: walking right across the edge is shorter than walking left.
#[inline]
pub fn toroidal_delta(a: DVec2, b: DVec2) -> DVec2 {
    let raw = b - a;
    DVec2::new(wrap_axis_delta(raw.x), wrap_axis_delta(raw.y))
}

#[inline]
pub fn toroidal_distance(a: DVec2, b: DVec2) -> f64 {
    toroidal_delta(a, b).length()
}

/// Normalizes an angle into (-PI, PI].
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    PI - (PI - angle).rem_euclid(TAU)
}

/// Angle of a displacement relative to a heading, in (-PI, PI].
#[inline]
pub fn bearing(heading: f64, delta: DVec2) -> f64 {
    normalize_angle(delta.y.atan2(delta.x) - heading)
}

/// Signed smallest rotation taking heading `from` to heading `to`.
#[inline]
pub fn heading_change(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}
