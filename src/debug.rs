/*
 * Debug Information Module
 *
 * This module defines FlockStats, a per-tick summary of the flock used for
 * logging and for quick checks on how a preset behaves.
 *
 * Includes metrics for:
 * - Tick count and population size
 * - Neighbor relations (how many agents see how many others)
 * - Isolated agents
 * - Polarization of the flock
 */

use glam::DVec2;
use serde::Serialize;

use crate::flock::Flock;
use crate::neighbors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FlockStats {
    pub tick: u64,
    pub agents: usize,
    /// Number of (agent, visible neighbor) pairs.
    pub neighbor_relations: usize,
    pub mean_neighbors: f64,
    /// Agents that currently see nobody.
    pub isolated: usize,
    /// Length of the mean heading vector: 1.0 when every agent flies the
    /// same way, near 0.0 for random headings.
    pub polarization: f64,
}

impl FlockStats {
    pub fn measure(flock: &Flock) -> Self {
        let agents = flock.agents();
        let config = flock.config();

        let mut neighbor_relations = 0;
        let mut isolated = 0;
        let mut heading_sum = DVec2::ZERO;
        for (i, agent) in agents.iter().enumerate() {
            let seen = neighbors::visible_neighbors(agents, i, config).count();
            neighbor_relations += seen;
            if seen == 0 {
                isolated += 1;
            }
            heading_sum += agent.velocity.normalize_or_zero();
        }

        let count = agents.len();
        let (mean_neighbors, polarization) = if count == 0 {
            (0.0, 0.0)
        } else {
            (
                neighbor_relations as f64 / count as f64,
                heading_sum.length() / count as f64,
            )
        };

        Self {
            tick: flock.tick_count(),
            agents: count,
            neighbor_relations,
            mean_neighbors,
            isolated,
            polarization,
        }
    }
}
