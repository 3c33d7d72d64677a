/*
 * Boid Flocking Engine - Module Definitions
 *
 * This file defines the module structure of the flocking engine.
 * Agents live on a wraparound plane [-1, 1) x [-1, 1), see only what lies
 * within their detection radius and field of view, and turn toward the
 * separation/alignment/cohesion target by a bounded angle each tick.
 */

// Re-export key components for easier access
pub use boid::{Agent, Role};
pub use debug::FlockStats;
pub use error::FlockError;
pub use flock::{initialize, Flock};
pub use neighbors::{neighbors_of, Neighbor};
pub use overlay::{FocalOverlay, Segment};
pub use params::FlockConfig;
pub use scenario::{OverlayFlags, Scenario};
pub use torus::toroidal_delta;

// Define modules
pub mod boid;
pub mod debug;
pub mod error;
pub mod flock;
pub mod neighbors;
pub mod overlay;
pub mod params;
pub mod scenario;
pub mod torus;

// Domain bounds
pub const DOMAIN_MIN: f64 = -1.0;
pub const DOMAIN_MAX: f64 = 1.0;
pub const DOMAIN_WIDTH: f64 = DOMAIN_MAX - DOMAIN_MIN;
