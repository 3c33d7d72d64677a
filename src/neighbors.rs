/*
 * Neighbors Module
 *
 * Vision-limited neighbor queries. An agent sees another agent when the
 * wrapped distance between them is below the detection radius (and not
 * zero) and the other agent lies inside its field of view.
 *
 * This is a brute-force scan over the whole population, O(n^2) per tick.
 */

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::boid::Agent;
use crate::params::FlockConfig;
use crate::torus;

/// Another agent as seen from the querying agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Index of the other agent in the population.
    pub index: usize,
    /// Wrapped displacement from the querying agent to the other agent.
    pub delta: DVec2,
    pub distance: f64,
}

// Field-of-view test for a displacement seen from `heading`
#[inline]
pub fn in_field_of_view(heading: f64, delta: DVec2, field_of_view: f64) -> bool {
    torus::bearing(heading, delta).abs() <= field_of_view / 2.0
}

/// Returns whether `other` is visible from `agent`, with the wrapped delta
/// and distance when it is.
#[inline]
pub fn sees(agent: &Agent, other: &Agent, config: &FlockConfig) -> Option<(DVec2, f64)> {
    let delta = torus::toroidal_delta(agent.position, other.position);
    let dist_sq = delta.length_squared();
    if dist_sq == 0.0 || dist_sq >= config.detection_radius * config.detection_radius {
        return None;
    }
    if !in_field_of_view(agent.heading, delta, config.field_of_view) {
        return None;
    }
    Some((delta, dist_sq.sqrt()))
}

/// Iterates over the neighbors visible from `agents[index]`.
pub fn visible_neighbors<'a>(
    agents: &'a [Agent],
    index: usize,
    config: &'a FlockConfig,
) -> impl Iterator<Item = Neighbor> + 'a {
    let agent = &agents[index];
    agents
        .iter()
        .enumerate()
        .filter(move |&(other_index, _)| other_index != index)
        .filter_map(move |(other_index, other)| {
            sees(agent, other, config).map(|(delta, distance)| Neighbor {
                index: other_index,
                delta,
                distance,
            })
        })
}

/// Collects the neighbors visible from `agents[index]`.
pub fn neighbors_of(agents: &[Agent], index: usize, config: &FlockConfig) -> Vec<Neighbor> {
    visible_neighbors(agents, index, config).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn config(detection_radius: f64, field_of_view: f64) -> FlockConfig {
        FlockConfig {
            detection_radius,
            field_of_view,
            ..FlockConfig::default()
        }
    }

    fn indices(neighbors: &[Neighbor]) -> Vec<usize> {
        let mut indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        indices.sort_unstable();
        indices
    }

    #[test]
    fn excludes_self_and_far_agents() {
        let agents = vec![
            Agent::with_heading(DVec2::ZERO, 0.0, 0.002),
            Agent::with_heading(DVec2::new(0.3, 0.0), 0.0, 0.002),
            Agent::with_heading(DVec2::new(0.6, 0.0), 0.0, 0.002),
        ];
        let found = neighbors_of(&agents, 0, &config(0.5, TAU));
        assert_eq!(indices(&found), vec![1]);
        assert!((found[0].distance - 0.3).abs() < 1e-12);
    }

    #[test]
    fn radius_is_strict() {
        let agents = vec![
            Agent::with_heading(DVec2::ZERO, 0.0, 0.002),
            Agent::with_heading(DVec2::new(0.5, 0.0), 0.0, 0.002),
        ];
        assert!(neighbors_of(&agents, 0, &config(0.5, TAU)).is_empty());
    }

    #[test]
    fn coincident_agents_are_not_neighbors() {
        let agents = vec![
            Agent::with_heading(DVec2::new(0.2, 0.2), 0.0, 0.002),
            Agent::with_heading(DVec2::new(0.2, 0.2), PI, 0.002),
        ];
        assert!(neighbors_of(&agents, 0, &config(0.5, TAU)).is_empty());
        assert!(neighbors_of(&agents, 1, &config(0.5, TAU)).is_empty());
    }

    #[test]
    fn sees_across_the_wrap_boundary() {
        let agents = vec![
            Agent::with_heading(DVec2::new(0.95, 0.0), 0.0, 0.002),
            Agent::with_heading(DVec2::new(-0.95, 0.0), 0.0, 0.002),
        ];
        let found = neighbors_of(&agents, 0, &config(0.5, TAU / 3.0));
        assert_eq!(indices(&found), vec![1]);
        assert!((found[0].delta - DVec2::new(0.1, 0.0)).length() < 1e-12);
    }

    #[test]
    fn field_of_view_hides_agents_behind() {
        let agents = vec![
            Agent::with_heading(DVec2::ZERO, 0.0, 0.002),
            Agent::with_heading(DVec2::new(0.2, 0.0), 0.0, 0.002),
            Agent::with_heading(DVec2::new(-0.2, 0.0), 0.0, 0.002),
            Agent::with_heading(DVec2::new(0.0, 0.2), 0.0, 0.002),
        ];
        // 120 degrees: only the agent straight ahead
        assert_eq!(indices(&neighbors_of(&agents, 0, &config(0.5, TAU / 3.0))), vec![1]);
        // 180 degrees: the agent at exactly 90 degrees sits on the edge
        assert_eq!(indices(&neighbors_of(&agents, 0, &config(0.5, PI))), vec![1, 3]);
        // Omnidirectional
        assert_eq!(indices(&neighbors_of(&agents, 0, &config(0.5, TAU))), vec![1, 2, 3]);
    }

    #[test]
    fn omnidirectional_visibility_is_symmetric() {
        let agents: Vec<Agent> = [(0.0, 0.0), (0.3, 0.1), (-0.9, 0.9), (0.85, -0.95), (0.1, -0.3)]
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Agent::with_heading(DVec2::new(x, y), i as f64, 0.002))
            .collect();
        let config = config(0.5, TAU);
        for a in 0..agents.len() {
            for b in 0..agents.len() {
                let a_sees_b = neighbors_of(&agents, a, &config).iter().any(|n| n.index == b);
                let b_sees_a = neighbors_of(&agents, b, &config).iter().any(|n| n.index == a);
                assert_eq!(a_sees_b, b_sees_a, "asymmetric between {a} and {b}");
            }
        }
    }

    #[test]
    fn zero_radius_sees_nobody() {
        let agents = vec![
            Agent::with_heading(DVec2::ZERO, 0.0, 0.002),
            Agent::with_heading(DVec2::new(0.001, 0.0), 0.0, 0.002),
        ];
        assert!(neighbors_of(&agents, 0, &config(0.0, TAU)).is_empty());
    }
}
