//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (emission order for particles, insertion order for obstacles)
//! - No rendering or platform dependencies

pub mod collision;
pub mod force;
pub mod fountain;
pub mod kdtree;
pub mod obstacle;
pub mod particle;
pub mod state;
pub mod tick;

pub use collision::{MoveResult, first_contact, move_particle, rebound};
pub use force::{ForceGenerator, Gravity};
pub use fountain::Fountain;
pub use kdtree::{KdNode, KdTree};
pub use obstacle::{Color, Obstacle, ObstacleKind, ObstacleStore};
pub use particle::Particle;
pub use state::{SimParams, SimState, TickStats};
pub use tick::{compute_dynamics, emit, move_all, tick};
