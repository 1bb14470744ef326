use serde::{Deserialize, Serialize};

use crate::Point;

/// A point mass moved by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    /// Sum of forces for the current tick
    #[serde(skip)]
    pub force: Point,
    pub mass: f64,
}

impl Particle {
    pub fn new(position: Point, velocity: Point, mass: f64) -> Self {
        Self {
            position,
            velocity,
            force: Point::ZERO,
            mass,
        }
    }

    /// Position after `dt` seconds at the current velocity
    #[inline]
    pub fn predicted(&self, dt: f64) -> Point {
        self.position + dt * self.velocity
    }
}
