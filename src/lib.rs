//! Deflector - a particle fountain bouncing off user-placed obstacles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (k-d tree, forces, collisions, state)
//! - `settings`: Data-driven simulation parameters
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

use glam::DVec2;

/// A point (or vector) in the simulation plane
pub type Point = DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep in seconds (200 Hz)
    pub const SIM_DT: f64 = 0.005;
    /// Presentation refresh period in seconds
    pub const DISPLAY_DT: f64 = 0.02;
    /// Statistics reporting period in seconds
    pub const STATS_DT: f64 = 1.0;

    /// Number of spatial dimensions indexed by the k-d tree
    pub const DIM: usize = 2;

    /// Radius of the obstacle query ball around a particle's predicted position.
    /// Larger than any displacement a particle can make in one tick.
    pub const QUERY_MARGIN: f64 = 0.05;

    /// Particles leaving [-DOMAIN_BOUND, DOMAIN_BOUND]² are removed
    pub const DOMAIN_BOUND: f64 = 1.5;

    /// Radius of an obstacle placed without an explicit size
    pub const OBSTACLE_RADIUS: f64 = 0.05;

    /// Uniform gravity (acceleration, world units/s²)
    pub const GRAVITY: [f64; 2] = [0.0, -0.2];
}

/// Next splitting axis after `axis`
#[inline]
pub fn next_axis(axis: usize) -> usize {
    (axis + 1) % consts::DIM
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a - b).length()
}

/// True if `p` lies in the closed square [-bound, bound]²
#[inline]
pub fn in_domain(p: Point, bound: f64) -> bool {
    p.x >= -bound && p.x <= bound && p.y >= -bound && p.y <= bound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_axis_cycles() {
        assert_eq!(next_axis(0), 1);
        assert_eq!(next_axis(1), 0);
    }

    #[test]
    fn test_in_domain_is_closed() {
        assert!(in_domain(Point::new(1.5, -1.5), 1.5));
        assert!(!in_domain(Point::new(1.5001, 0.0), 1.5));
        assert!(!in_domain(Point::new(0.0, -2.0), 1.5));
    }
}
