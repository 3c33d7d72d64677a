/*
 * Overlay Module
 *
 * Debug geometry derived from a population snapshot: agent triangles, the
 * focal agent's detection circle and view sector, links to its visible
 * neighbors, heading ticks and the local centroid it steers toward.
 *
 * Nothing here is engine state. Every function reads a snapshot and
 * returns fresh vertices in domain coordinates, so a renderer can rebuild
 * the overlay every frame and draw it however it likes.
 */

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec2;
use serde::Serialize;

use crate::boid::{rotate, Agent, Neighborhood};
use crate::flock::Flock;
use crate::neighbors;
use crate::params::FlockConfig;
use crate::scenario::OverlayFlags;
use crate::torus;
use crate::{DOMAIN_MAX, DOMAIN_MIN, DOMAIN_WIDTH};

/// Distance from an edge at which shapes are also drawn on the other side.
pub const MARGIN: f64 = 0.08;
/// Length of an agent triangle from tip to base.
pub const AGENT_SIZE: f64 = 0.06;
/// Length of the heading tick drawn in front of an agent.
pub const LINE_LENGTH: f64 = 0.1;
pub const CIRCLE_SEGMENTS: usize = 32;

// A segment can cross each axis at most once, so it splits into at most 3 pieces
const MAX_PIECES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    pub fn delta(&self) -> DVec2 {
        self.end - self.start
    }
}

// Offset that carries a coordinate near an edge to the opposite side
fn edge_shift(coord: f64, margin: f64) -> Option<f64> {
    if coord > DOMAIN_MAX - margin {
        Some(-DOMAIN_WIDTH)
    } else if coord < DOMAIN_MIN + margin {
        Some(DOMAIN_WIDTH)
    } else {
        None
    }
}

/// Offsets at which a shape centred on `position` has to be drawn so that
/// it shows on both sides of an edge. Always starts with the zero offset.
pub fn ghost_offsets(position: DVec2, margin: f64) -> Vec<DVec2> {
    let mut offsets = vec![DVec2::ZERO];
    let shift_x = edge_shift(position.x, margin);
    let shift_y = edge_shift(position.y, margin);

    if let Some(dx) = shift_x {
        offsets.push(DVec2::new(dx, 0.0));
    }
    if let Some(dy) = shift_y {
        offsets.push(DVec2::new(0.0, dy));
    }
    if let (Some(dx), Some(dy)) = (shift_x, shift_y) {
        offsets.push(DVec2::new(dx, dy));
    }
    offsets
}

// Fraction of `step` travelled before `coord` leaves the domain, if it does
fn exit_fraction(coord: f64, step: f64) -> Option<f64> {
    let end = coord + step;
    if step > 0.0 && end > DOMAIN_MAX {
        Some((DOMAIN_MAX - coord) / step)
    } else if step < 0.0 && end < DOMAIN_MIN {
        Some((DOMAIN_MIN - coord) / step)
    } else {
        None
    }
}

// Edge reached when moving along `step`, and the edge re-entered from
fn crossing_edges(step: f64) -> (f64, f64) {
    if step > 0.0 {
        (DOMAIN_MAX, DOMAIN_MIN)
    } else {
        (DOMAIN_MIN, DOMAIN_MAX)
    }
}

/// Splits the straight path from `start` along `delta` into pieces that
/// stay inside the domain, re-entering at the opposite edge after each
/// crossing.
///
/// `start` must lie in the domain and each component of `delta` must be at
/// most the half-width, which holds for any toroidal delta.
pub fn wrapped_segments(start: DVec2, delta: DVec2) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(MAX_PIECES);
    let mut origin = start;
    let mut remaining = delta;

    for _ in 0..MAX_PIECES {
        let exit_x = exit_fraction(origin.x, remaining.x);
        let exit_y = exit_fraction(origin.y, remaining.y);
        let t = match (exit_x, exit_y) {
            (None, None) => {
                segments.push(Segment::new(origin, origin + remaining));
                return segments;
            }
            (Some(tx), None) => tx,
            (None, Some(ty)) => ty,
            (Some(tx), Some(ty)) => tx.min(ty),
        };

        let mut crossing = origin + remaining * t;
        let mut reentry = crossing;
        if exit_x.is_some_and(|tx| tx <= t) {
            let (edge, opposite) = crossing_edges(remaining.x);
            crossing.x = edge;
            reentry.x = opposite;
        }
        if exit_y.is_some_and(|ty| ty <= t) {
            let (edge, opposite) = crossing_edges(remaining.y);
            crossing.y = edge;
            reentry.y = opposite;
        }

        if t > 0.0 {
            segments.push(Segment::new(origin, crossing));
        }
        origin = reentry;
        remaining *= 1.0 - t;
    }

    segments
}

/// Links from agent `index` to every neighbor it currently sees, clipped
/// at the domain edges.
pub fn neighbor_links(agents: &[Agent], index: usize, config: &FlockConfig) -> Vec<Segment> {
    let origin = agents[index].position;
    neighbors::visible_neighbors(agents, index, config)
        .flat_map(|neighbor| wrapped_segments(origin, neighbor.delta))
        .collect()
}

/// Triangle-fan vertices of a filled circle: the centre, `segments`
/// perimeter points, then the first perimeter point again to close the fan.
pub fn detection_circle(center: DVec2, radius: f64, segments: usize) -> Vec<DVec2> {
    let mut vertices = Vec::with_capacity(segments + 2);
    vertices.push(center);
    for i in 0..segments {
        let angle = i as f64 / segments as f64 * TAU;
        vertices.push(center + DVec2::new(angle.cos(), angle.sin()) * radius);
    }
    if segments > 0 {
        vertices.push(vertices[1]);
    }
    vertices
}

/// Triangle-fan vertices of the wedge an agent can see: the centre, then
/// `segments + 1` arc points sweeping from one edge of the view to the other.
pub fn view_sector(agent: &Agent, radius: f64, field_of_view: f64, segments: usize) -> Vec<DVec2> {
    let mut vertices = Vec::with_capacity(segments + 2);
    vertices.push(agent.position);
    let start = agent.heading - field_of_view / 2.0;
    let steps = segments.max(1);
    for i in 0..=steps {
        let angle = start + field_of_view * i as f64 / steps as f64;
        vertices.push(agent.position + DVec2::new(angle.cos(), angle.sin()) * radius);
    }
    vertices
}

/// Oriented triangle for an agent: tip first, then the two base corners.
pub fn agent_triangle(agent: &Agent, size: f64) -> [DVec2; 3] {
    // Drawn pointing up, then turned to the heading
    let turn = agent.heading - FRAC_PI_2;
    [
        DVec2::new(0.0, size),
        DVec2::new(-size / 2.0, -size / 1.5),
        DVec2::new(size / 2.0, -size / 1.5),
    ]
    .map(|corner| agent.position + rotate(corner, turn))
}

/// Heading tick running from the agent's tip `length` further forward.
pub fn direction_line(agent: &Agent, size: f64, length: f64) -> Segment {
    let dir = DVec2::new(agent.heading.cos(), agent.heading.sin());
    Segment::new(
        agent.position + dir * size,
        agent.position + dir * (size + length),
    )
}

/// Wrapped centroid of the neighbors visible from agent `index`, or `None`
/// when it sees nobody.
pub fn local_centroid(agents: &[Agent], index: usize, config: &FlockConfig) -> Option<DVec2> {
    let neighborhood = Neighborhood::gather(
        agents,
        neighbors::visible_neighbors(agents, index, config),
    );
    neighborhood
        .centroid_offset()
        .map(|offset| torus::wrap_point(agents[index].position + offset))
}

/// Everything drawn around the focal agent for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocalOverlay {
    pub focal_index: usize,
    /// Offsets at which the focal shapes repeat across nearby edges.
    pub ghost_offsets: Vec<DVec2>,
    pub detection_circle: Option<Vec<DVec2>>,
    pub view_sector: Option<Vec<DVec2>>,
    pub neighbor_links: Vec<Segment>,
    /// Heading ticks for the focal agent and each visible neighbor.
    pub direction_lines: Vec<Segment>,
    pub local_centroid: Option<DVec2>,
}

impl FocalOverlay {
    /// Builds the overlays selected by `flags`, or `None` if the flock has
    /// no focal agent or no overlay is enabled.
    pub fn build(flock: &Flock, flags: &OverlayFlags) -> Option<Self> {
        if !flags.any() {
            return None;
        }
        let index = flock.focal_index()?;
        let agents = flock.agents();
        let config = flock.config();
        let focal = &agents[index];

        let detection_circle = flags.detection_circle.then(|| {
            detection_circle(focal.position, config.detection_radius, CIRCLE_SEGMENTS)
        });
        let view_sector = flags.view_sector.then(|| {
            view_sector(
                focal,
                config.detection_radius,
                config.field_of_view,
                CIRCLE_SEGMENTS,
            )
        });
        let neighbor_links = if flags.neighbor_links {
            neighbor_links(agents, index, config)
        } else {
            Vec::new()
        };
        let direction_lines = if flags.direction_lines {
            std::iter::once(index)
                .chain(neighbors::visible_neighbors(agents, index, config).map(|n| n.index))
                .map(|i| direction_line(&agents[i], AGENT_SIZE, LINE_LENGTH))
                .collect()
        } else {
            Vec::new()
        };
        let local_centroid = if flags.local_centroid {
            local_centroid(agents, index, config)
        } else {
            None
        };

        Some(Self {
            focal_index: index,
            ghost_offsets: ghost_offsets(focal.position, MARGIN),
            detection_circle,
            view_sector,
            neighbor_links,
            direction_lines,
            local_centroid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    fn assert_vec_eq(actual: DVec2, expected: DVec2) {
        assert!(
            (actual - expected).length() < EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn total_delta(segments: &[Segment]) -> DVec2 {
        segments.iter().map(Segment::delta).sum()
    }

    #[test]
    fn interior_point_has_no_ghosts() {
        assert_eq!(ghost_offsets(DVec2::new(0.0, 0.5), MARGIN), vec![DVec2::ZERO]);
    }

    #[test]
    fn corner_point_has_three_ghosts() {
        let offsets = ghost_offsets(DVec2::new(0.95, -0.97), MARGIN);
        assert_eq!(
            offsets,
            vec![
                DVec2::ZERO,
                DVec2::new(-2.0, 0.0),
                DVec2::new(0.0, 2.0),
                DVec2::new(-2.0, 2.0),
            ]
        );
    }

    #[test]
    fn segment_inside_the_domain_is_untouched() {
        let segments = wrapped_segments(DVec2::new(0.1, 0.1), DVec2::new(0.2, -0.3));
        assert_eq!(segments.len(), 1);
        assert_vec_eq(segments[0].end, DVec2::new(0.3, -0.2));
    }

    #[test]
    fn segment_crossing_one_edge_reenters_opposite() {
        let segments = wrapped_segments(DVec2::new(0.9, 0.0), DVec2::new(0.2, 0.1));
        assert_eq!(segments.len(), 2);
        assert_vec_eq(segments[0].start, DVec2::new(0.9, 0.0));
        assert_vec_eq(segments[0].end, DVec2::new(1.0, 0.05));
        assert_vec_eq(segments[1].start, DVec2::new(-1.0, 0.05));
        assert_vec_eq(segments[1].end, DVec2::new(-0.9, 0.1));
    }

    #[test]
    fn segment_crossing_both_edges_splits_in_three() {
        let delta = DVec2::new(0.2, 0.4);
        let segments = wrapped_segments(DVec2::new(0.9, 0.9), delta);
        assert_eq!(segments.len(), 3);
        assert_vec_eq(segments[0].end, DVec2::new(0.95, 1.0));
        assert_vec_eq(segments[1].start, DVec2::new(0.95, -1.0));
        assert_vec_eq(segments[1].end, DVec2::new(1.0, -0.9));
        assert_vec_eq(segments[2].start, DVec2::new(-1.0, -0.9));
        assert_vec_eq(segments[2].end, DVec2::new(-0.9, -0.7));
        assert_vec_eq(total_delta(&segments), delta);
    }

    #[test]
    fn segment_through_the_exact_corner() {
        let delta = DVec2::new(-0.2, -0.2);
        let segments = wrapped_segments(DVec2::new(-0.9, -0.9), delta);
        assert_eq!(segments.len(), 2);
        assert_vec_eq(segments[0].end, DVec2::new(-1.0, -1.0));
        assert_vec_eq(segments[1].start, DVec2::new(1.0, 1.0));
        assert_vec_eq(segments[1].end, DVec2::new(0.9, 0.9));
    }

    #[test]
    fn links_follow_the_short_way_round() {
        let config = FlockConfig {
            agent_count: 2,
            field_of_view: TAU,
            ..FlockConfig::default()
        };
        let agents = vec![
            Agent::with_heading(DVec2::new(0.95, 0.0), 0.0, config.speed),
            Agent::with_heading(DVec2::new(-0.95, 0.0), 0.0, config.speed),
        ];
        let links = neighbor_links(&agents, 0, &config);
        assert_eq!(links.len(), 2);
        assert_vec_eq(total_delta(&links), DVec2::new(0.1, 0.0));
    }

    #[test]
    fn circle_fan_is_closed() {
        let vertices = detection_circle(DVec2::new(0.2, 0.3), 0.5, CIRCLE_SEGMENTS);
        assert_eq!(vertices.len(), CIRCLE_SEGMENTS + 2);
        assert_eq!(vertices[0], DVec2::new(0.2, 0.3));
        assert_eq!(vertices[1], vertices[CIRCLE_SEGMENTS + 1]);
        for v in &vertices[1..] {
            assert!(((*v - vertices[0]).length() - 0.5).abs() < EPSILON);
        }
    }

    #[test]
    fn sector_is_centred_on_heading() {
        let agent = Agent::with_heading(DVec2::ZERO, FRAC_PI_2, 0.002);
        let vertices = view_sector(&agent, 0.5, PI / 2.0, 2);
        assert_eq!(vertices.len(), 4);
        assert_vec_eq(vertices[2], DVec2::new(0.0, 0.5));
        let edge = 0.5 * (PI / 4.0).cos();
        assert_vec_eq(vertices[1], DVec2::new(edge, edge));
        assert_vec_eq(vertices[3], DVec2::new(-edge, edge));
    }

    #[test]
    fn triangle_points_along_heading() {
        let agent = Agent::with_heading(DVec2::new(0.1, 0.1), 0.0, 0.002);
        let [tip, left, right] = agent_triangle(&agent, AGENT_SIZE);
        assert_vec_eq(tip, DVec2::new(0.1 + AGENT_SIZE, 0.1));
        assert!(left.x < agent.position.x && right.x < agent.position.x);
        assert!(left.y > agent.position.y && right.y < agent.position.y);
    }

    #[test]
    fn direction_line_starts_at_the_tip() {
        let agent = Agent::with_heading(DVec2::ZERO, PI, 0.002);
        let line = direction_line(&agent, AGENT_SIZE, LINE_LENGTH);
        assert_vec_eq(line.start, DVec2::new(-AGENT_SIZE, 0.0));
        assert_vec_eq(line.end, DVec2::new(-AGENT_SIZE - LINE_LENGTH, 0.0));
    }

    #[test]
    fn centroid_wraps_back_into_the_domain() {
        let config = FlockConfig {
            agent_count: 3,
            field_of_view: TAU,
            ..FlockConfig::default()
        };
        let agents = vec![
            Agent::with_heading(DVec2::new(0.95, 0.0), 0.0, config.speed),
            Agent::with_heading(DVec2::new(-0.95, 0.1), 0.0, config.speed),
            Agent::with_heading(DVec2::new(-0.95, -0.1), 0.0, config.speed),
        ];
        let centroid = local_centroid(&agents, 0, &config).expect("two neighbors in range");
        assert_vec_eq(centroid, DVec2::new(-0.95, 0.0));
    }

    #[test]
    fn isolated_agent_has_no_centroid() {
        let config = FlockConfig {
            agent_count: 2,
            ..FlockConfig::default()
        };
        let agents = vec![
            Agent::with_heading(DVec2::ZERO, 0.0, config.speed),
            Agent::with_heading(DVec2::new(0.9, 0.9), 0.0, config.speed),
        ];
        assert_eq!(local_centroid(&agents, 0, &config), None);
    }
}
