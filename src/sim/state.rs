//! Simulation state
//!
//! Everything one simulation run owns lives in [`SimState`], which is passed
//! by reference into the tick functions.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::force::{ForceGenerator, Gravity};
use super::fountain::Fountain;
use super::kdtree::KdTree;
use super::obstacle::{Color, Obstacle, ObstacleStore};
use super::particle::Particle;
use crate::Point;
use crate::settings::Settings;

/// Counters accumulated across ticks until taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub ticks: u64,
    pub emitted: usize,
    pub culled: usize,
    pub collisions: usize,
    /// Distance evaluations in range queries and contact scans
    pub distance_tests: usize,
}

/// Per-run simulation parameters fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    pub query_margin: f64,
    pub domain_bound: f64,
    pub obstacle_radius: f64,
}

impl From<&Settings> for SimParams {
    fn from(settings: &Settings) -> Self {
        Self {
            query_margin: settings.query_margin,
            domain_bound: settings.domain_bound,
            obstacle_radius: settings.obstacle_radius,
        }
    }
}

/// Complete simulation state
#[derive(Debug)]
pub struct SimState {
    pub params: SimParams,
    /// Live particles, in emission order
    pub particles: Vec<Particle>,
    pub forces: Vec<Box<dyn ForceGenerator>>,
    pub fountains: Vec<Fountain>,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub stats: TickStats,
    pub(super) obstacles: ObstacleStore,
    pub(super) index: KdTree,
}

impl SimState {
    /// Fresh state with gravity and the fountains from `settings`. Obstacle
    /// placements are left to the caller.
    pub fn new(settings: &Settings) -> Self {
        Self {
            params: SimParams::from(settings),
            particles: Vec::new(),
            forces: vec![Box::new(Gravity::new(settings.gravity()))],
            fountains: settings.fountains.clone(),
            rng: Pcg32::seed_from_u64(settings.seed),
            time_ticks: 0,
            stats: TickStats::default(),
            obstacles: ObstacleStore::new(),
            index: KdTree::empty(),
        }
    }

    /// State with no forces, fountains, or obstacles
    pub fn bare(params: SimParams) -> Self {
        Self {
            params,
            particles: Vec::new(),
            forces: Vec::new(),
            fountains: Vec::new(),
            rng: Pcg32::seed_from_u64(0),
            time_ticks: 0,
            stats: TickStats::default(),
            obstacles: ObstacleStore::new(),
            index: KdTree::empty(),
        }
    }

    pub fn obstacles(&self) -> &ObstacleStore {
        &self.obstacles
    }

    /// Current spatial index; read-only for the duration of a tick
    pub fn index(&self) -> &KdTree {
        &self.index
    }

    /// Add an obstacle and rebuild the index from the whole store
    pub fn insert_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.insert(obstacle);
        self.rebuild_index();
    }

    /// Place a default-radius black disc, as a click does
    pub fn place_obstacle(&mut self, center: Point, attenuation: f64) {
        let radius = self.params.obstacle_radius;
        self.insert_obstacle(Obstacle::new(center, radius, attenuation, Color::BLACK));
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        self.index = KdTree::build(self.obstacles.as_slice());
        log::debug!(
            "Rebuilt obstacle index: {} nodes, depth {}",
            self.index.len(),
            self.index.depth()
        );
    }

    pub fn add_force(&mut self, force: impl ForceGenerator + 'static) {
        self.forces.push(Box::new(force));
    }

    /// Return the counters gathered since the last call and reset them
    pub fn take_stats(&mut self) -> TickStats {
        std::mem::take(&mut self.stats)
    }
}
