/*
 * Flock Module
 *
 * This module owns the population and advances it one tick at a time.
 * Every tick runs in two phases:
 * 1. Read: compute each agent's next velocity from the previous tick's
 *    state. No agent is written during this phase, so update order never
 *    leaks into the result.
 * 2. Write: apply the new velocity, move, wrap and refresh the heading.
 *
 * Both phases can run on the rayon thread pool. The read phase only shares
 * immutable state and the write phase touches disjoint agents, so the
 * parallel and sequential paths produce identical flocks.
 */

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::boid::{self, Agent, Neighborhood, Role};
use crate::error::FlockError;
use crate::neighbors::{self, Neighbor};
use crate::params::FlockConfig;
use crate::torus;
use crate::{DOMAIN_MAX, DOMAIN_MIN};

/// Builds a random population for `config`.
///
/// Positions are uniform over the domain and headings are drawn uniformly
/// from `[0, TAU)`, then stored as the velocity angle in (-PI, PI]. Agent 0
/// is tagged as the focal agent.
pub fn initialize<R: Rng>(
    config: &FlockConfig,
    rng: &mut R,
) -> Result<Vec<Agent>, FlockError> {
    config.validate()?;

    let mut agents = Vec::with_capacity(config.agent_count);
    for _ in 0..config.agent_count {
        let x = rng.gen_range(DOMAIN_MIN..DOMAIN_MAX);
        let y = rng.gen_range(DOMAIN_MIN..DOMAIN_MAX);
        let heading = rng.gen_range(0.0..TAU);
        agents.push(Agent::with_heading(DVec2::new(x, y), heading, config.speed));
    }
    tag_focal(&mut agents);

    Ok(agents)
}

fn tag_focal(agents: &mut [Agent]) {
    for (i, agent) in agents.iter_mut().enumerate() {
        agent.role = if i == 0 { Role::Focal } else { Role::Member };
    }
}

/// The flocking engine.
#[derive(Debug, Clone)]
pub struct Flock {
    config: FlockConfig,
    agents: Vec<Agent>,
    tick_count: u64,
}

impl Flock {
    /// Creates a flock with a random population, seeded from `config.rng_seed`.
    pub fn new(config: FlockConfig) -> Result<Self, FlockError> {
        let mut rng = config.seeded_rng();
        Self::with_rng(config, &mut rng)
    }

    /// Creates a flock drawing its initial population from `rng`.
    pub fn with_rng<R: Rng>(config: FlockConfig, rng: &mut R) -> Result<Self, FlockError> {
        let agents = initialize(&config, rng)?;
        debug!(
            agents = agents.len(),
            seed = ?config.rng_seed,
            parallel = config.parallel,
            "flock initialized"
        );
        Ok(Self {
            config,
            agents,
            tick_count: 0,
        })
    }

    /// Creates a flock from an explicit placement.
    pub fn from_agents(config: FlockConfig, agents: Vec<Agent>) -> Result<Self, FlockError> {
        config.validate()?;
        if agents.len() != config.agent_count {
            return Err(FlockError::InvalidConfig(
                "number of agents must match agent_count",
            ));
        }
        if agents
            .iter()
            .any(|agent| !agent.position.is_finite() || !agent.velocity.is_finite())
        {
            return Err(FlockError::InvalidConfig(
                "agent position and velocity must be finite",
            ));
        }

        let mut agents: Vec<Agent> = agents
            .into_iter()
            .map(|agent| Agent {
                position: torus::wrap_point(agent.position),
                heading: boid::heading_of(agent.velocity),
                ..agent
            })
            .collect();
        tag_focal(&mut agents);

        debug!(agents = agents.len(), "flock placed");
        Ok(Self {
            config,
            agents,
            tick_count: 0,
        })
    }

    /// Advances every agent by one tick.
    pub fn tick(&mut self) {
        let config = &self.config;
        let snapshot = &self.agents;

        // Read phase
        let next: Vec<(DVec2, usize)> = if config.parallel {
            (0..snapshot.len())
                .into_par_iter()
                .map(|i| steer(snapshot, i, config))
                .collect()
        } else {
            (0..snapshot.len())
                .map(|i| steer(snapshot, i, config))
                .collect()
        };

        let steering_neighbors: usize = next.iter().map(|&(_, count)| count).sum();

        // Write phase
        if config.parallel {
            self.agents
                .par_iter_mut()
                .zip(next.par_iter())
                .for_each(|(agent, &(velocity, _))| agent.advance(velocity));
        } else {
            for (agent, &(velocity, _)) in self.agents.iter_mut().zip(next.iter()) {
                agent.advance(velocity);
            }
        }

        self.tick_count += 1;
        trace!(tick = self.tick_count, steering_neighbors, "flock ticked");
    }

    /// Advances the flock by `ticks` ticks.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Immutable snapshot of the population, in a fixed order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    /// The agent tagged for debug overlays.
    pub fn focal(&self) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.is_focal())
    }

    pub fn focal_index(&self) -> Option<usize> {
        self.agents.iter().position(|agent| agent.is_focal())
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Neighbors currently visible from agent `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn neighbors_of(&self, index: usize) -> Vec<Neighbor> {
        neighbors::neighbors_of(&self.agents, index, &self.config)
    }

    pub fn toroidal_delta(a: DVec2, b: DVec2) -> DVec2 {
        torus::toroidal_delta(a, b)
    }
}

// Next velocity of agent `index` plus the number of neighbors its steering
// used. Zero when no rule is active, since the scan is skipped.
fn steer(snapshot: &[Agent], index: usize, config: &FlockConfig) -> (DVec2, usize) {
    let agent = &snapshot[index];
    let neighborhood = if config.has_active_rules() {
        Neighborhood::gather(
            snapshot,
            neighbors::visible_neighbors(snapshot, index, config),
        )
    } else {
        // No rule can react, skip the scan
        Neighborhood::default()
    };
    (
        boid::next_velocity(agent, &neighborhood, config),
        neighborhood.count,
    )
}
