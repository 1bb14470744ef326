//! Stochastic particle sources
//!
//! Each tick a fountain rolls once and, on success, emits one particle with a
//! randomly perturbed launch velocity.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::sim::particle::Particle;

/// A particle emitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fountain {
    /// Chance of emitting on a given tick, in [0, 1]
    pub probability: f64,
    /// Upper bound of the random velocity perturbation
    pub variance: f64,
    pub position: Point,
    pub velocity: Point,
    pub mass: f64,
}

impl Fountain {
    /// Roll for this tick. The perturbation slows x and speeds up y.
    pub fn emit<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Particle> {
        if rng.random::<f64>() >= self.probability {
            return None;
        }
        let dvx = rng.random::<f64>() * self.variance;
        let dvy = rng.random::<f64>() * self.variance;
        let velocity = Point::new(self.velocity.x - dvx, self.velocity.y + dvy);
        Some(Particle::new(self.position, velocity, self.mass))
    }

    /// The three sources of the stock demo, all at the upper-left
    pub fn defaults() -> Vec<Self> {
        let position = Point::new(-0.5, 0.5);
        let velocity = Point::new(0.3, 0.3);
        [(0.2, 0.1, 1.0), (0.25, 0.2, 0.5), (0.6, 0.18, 2.5)]
            .into_iter()
            .map(|(probability, variance, mass)| Self {
                probability,
                variance,
                position,
                velocity,
                mass,
            })
            .collect()
    }
}
