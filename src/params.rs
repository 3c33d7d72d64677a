/*
 * Simulation Parameters Module
 *
 * This module defines the FlockConfig struct holding every tunable value of
 * a flock. A config is fixed for the lifetime of the flock built from it; to
 * try other values, build a new flock. Configs can be loaded from JSON so a
 * driver can ship its own presets next to the built-in scenarios.
 */

use std::f64::consts::{PI, TAU};
use std::fs;
use std::path::Path;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::FlockError;

/// Static configuration for a flock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    /// Number of agents, fixed for the flock's lifetime.
    pub agent_count: usize,
    /// Distance travelled per tick.
    pub speed: f64,
    /// Agents strictly closer than this (on the torus) may be neighbors.
    pub detection_radius: f64,
    /// Full view angle in radians, centred on the heading. `TAU` sees all around.
    pub field_of_view: f64,
    /// Largest heading change applied in one tick, in radians.
    pub max_turn_rate: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    /// Optional RNG seed for reproducible flocks.
    pub rng_seed: Option<u64>,
    /// Run the tick phases on the rayon thread pool.
    pub parallel: bool,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            agent_count: 80,
            speed: 0.002,
            detection_radius: 0.5,
            field_of_view: TAU / 3.0, // 120 degrees
            max_turn_rate: PI / 60.0, // 3 degrees per tick
            separation_weight: 0.005,
            alignment_weight: 0.005,
            cohesion_weight: 0.005,
            rng_seed: None,
            parallel: true,
        }
    }
}

impl FlockConfig {
    /// Checks every value a flock depends on.
    pub fn validate(&self) -> Result<(), FlockError> {
        if self.agent_count < 1 {
            return Err(FlockError::InvalidConfig("agent_count must be at least 1"));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(FlockError::InvalidConfig("speed must be positive"));
        }
        if !self.detection_radius.is_finite() || self.detection_radius < 0.0 {
            return Err(FlockError::InvalidConfig(
                "detection_radius must be non-negative",
            ));
        }
        if !self.field_of_view.is_finite() || self.field_of_view < 0.0 {
            return Err(FlockError::InvalidConfig(
                "field_of_view must be non-negative",
            ));
        }
        if !self.max_turn_rate.is_finite() || self.max_turn_rate < 0.0 {
            return Err(FlockError::InvalidConfig(
                "max_turn_rate must be non-negative",
            ));
        }
        let weights = [
            self.separation_weight,
            self.alignment_weight,
            self.cohesion_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(FlockError::InvalidConfig(
                "separation, alignment and cohesion weights must be non-negative",
            ));
        }
        Ok(())
    }

    // True when at least one flocking rule can change a velocity
    pub fn has_active_rules(&self) -> bool {
        self.separation_weight > 0.0 || self.alignment_weight > 0.0 || self.cohesion_weight > 0.0
    }

    /// Returns the configured RNG, seeding from entropy if no seed is set.
    pub fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => {
                let seed: u64 = rand::random();
                SmallRng::seed_from_u64(seed)
            }
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, FlockError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config from a JSON file. Missing fields take default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlockError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| FlockError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, FlockError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
