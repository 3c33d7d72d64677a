/*
 * Boid Module
 *
 * This module defines the Agent struct and its steering behavior.
 * Each agent reacts only to the neighbors it can see, following three rules:
 * 1. Separation: Move away from each visible neighbor
 * 2. Alignment: Match the mean velocity of visible neighbors
 * 3. Cohesion: Move toward the local centroid of visible neighbors
 *
 * The rules only propose a desired velocity. The agent then turns toward it
 * by at most `max_turn_rate` per tick and always cruises at `speed`.
 */

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::neighbors::Neighbor;
use crate::params::FlockConfig;
use crate::torus;

/// Marks the agent that debug overlays are drawn around. Physics ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Member,
    Focal,
}

/// One simulated agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Angle of `velocity`, refreshed every tick.
    pub heading: f64,
    pub role: Role,
}

impl Agent {
    pub fn new(position: DVec2, velocity: DVec2) -> Self {
        Self {
            position: torus::wrap_point(position),
            velocity,
            heading: heading_of(velocity),
            role: Role::Member,
        }
    }

    /// Creates an agent cruising at `speed` along `heading`.
    pub fn with_heading(position: DVec2, heading: f64, speed: f64) -> Self {
        Self::new(position, DVec2::new(heading.cos(), heading.sin()) * speed)
    }

    pub fn is_focal(&self) -> bool {
        self.role == Role::Focal
    }

    // Move one tick along the current velocity and refresh the heading
    pub fn advance(&mut self, velocity: DVec2) {
        self.velocity = velocity;
        self.position = torus::wrap_point(self.position + velocity);
        self.heading = heading_of(velocity);
    }
}

#[inline]
pub fn heading_of(velocity: DVec2) -> f64 {
    velocity.y.atan2(velocity.x)
}

/// Running sums over an agent's visible neighbors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Neighborhood {
    pub count: usize,
    // Sum of unit vectors pointing away from each neighbor
    pub away_sum: DVec2,
    pub velocity_sum: DVec2,
    pub delta_sum: DVec2,
}

impl Neighborhood {
    /// Gathers sums over `neighbors`. Neighbors at zero distance must
    /// already have been filtered out.
    pub fn gather<I>(agents: &[Agent], neighbors: I) -> Self
    where
        I: IntoIterator<Item = Neighbor>,
    {
        let mut sums = Self::default();
        for neighbor in neighbors {
            sums.away_sum -= neighbor.delta / neighbor.distance;
            sums.velocity_sum += agents[neighbor.index].velocity;
            sums.delta_sum += neighbor.delta;
            sums.count += 1;
        }
        sums
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    // Mean displacement to the neighbors, i.e. the local centroid relative to the agent
    pub fn centroid_offset(&self) -> Option<DVec2> {
        (!self.is_empty()).then(|| self.delta_sum / self.count as f64)
    }

    pub fn separation(&self, weight: f64) -> DVec2 {
        if self.is_empty() {
            return DVec2::ZERO;
        }
        self.away_sum / self.count as f64 * weight
    }

    pub fn alignment(&self, velocity: DVec2, weight: f64) -> DVec2 {
        if self.is_empty() {
            return DVec2::ZERO;
        }
        (self.velocity_sum / self.count as f64 - velocity) * weight
    }

    pub fn cohesion(&self, weight: f64) -> DVec2 {
        self.centroid_offset()
            .map_or(DVec2::ZERO, |offset| offset * weight)
    }

    /// Sum of the three weighted rule contributions.
    pub fn steering(&self, velocity: DVec2, config: &FlockConfig) -> DVec2 {
        if self.is_empty() {
            return DVec2::ZERO;
        }
        self.separation(config.separation_weight)
            + self.alignment(velocity, config.alignment_weight)
            + self.cohesion(config.cohesion_weight)
    }
}

// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(vector: DVec2, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    DVec2::new(
        vector.x * cos - vector.y * sin,
        vector.x * sin + vector.y * cos,
    )
}

/// Turns `current` toward `desired` by at most `max_turn` radians and
/// returns the result scaled to `speed`.
///
/// A zero `desired` keeps `current` as is. A zero `current` has no direction
/// to rotate from, so the result points straight along `desired`.
pub fn turn_towards(current: DVec2, desired: DVec2, max_turn: f64, speed: f64) -> DVec2 {
    let desired_len = desired.length();
    if desired_len == 0.0 {
        return current;
    }
    let desired_dir = desired / desired_len;

    let current_len = current.length();
    if current_len == 0.0 {
        return desired_dir * speed;
    }
    let current_dir = current / current_len;

    let dot = current_dir.dot(desired_dir).clamp(-1.0, 1.0);
    let angle = dot.acos().min(max_turn);
    let turn = if current_dir.perp_dot(desired_dir) >= 0.0 {
        angle
    } else {
        -angle
    };

    rotate(current_dir, turn) * speed
}

/// Velocity for the next tick given the agent's visible neighborhood.
pub fn next_velocity(agent: &Agent, neighborhood: &Neighborhood, config: &FlockConfig) -> DVec2 {
    let steering = neighborhood.steering(agent.velocity, config);
    if steering == DVec2::ZERO {
        // Nothing pulls on the agent: hold course at cruising speed
        return agent
            .velocity
            .try_normalize()
            .map_or(agent.velocity, |dir| dir * config.speed);
    }
    turn_towards(
        agent.velocity,
        agent.velocity + steering,
        config.max_turn_rate,
        config.speed,
    )
}
