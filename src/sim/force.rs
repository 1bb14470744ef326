//! Force generators applied to every particle each tick

use std::fmt::Debug;

use crate::Point;
use crate::sim::particle::Particle;

/// Something that pushes particles around
pub trait ForceGenerator: Debug {
    /// Force to add to `particle`'s accumulator this tick
    fn contribute(&self, particle: &Particle) -> Point;
}

/// Uniform gravitational field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Acceleration shared by every particle
    pub acceleration: Point,
}

impl Gravity {
    pub fn new(acceleration: Point) -> Self {
        Self { acceleration }
    }
}

impl ForceGenerator for Gravity {
    fn contribute(&self, particle: &Particle) -> Point {
        particle.mass * self.acceleration
    }
}
