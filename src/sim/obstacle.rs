//! Circular obstacles and their append-only store
//!
//! The store is the backing collection the k-d tree is built from. Entries are
//! plain values: a tree built from the store holds its own copies.

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::consts::OBSTACLE_RADIUS;

/// Initial backing capacity of an [`ObstacleStore`]
pub const STORE_INITIAL_CAPACITY: usize = 10;

/// Obstacle shape. Only discs exist for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Disc,
}

/// RGB color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// A circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub center: Point,
    pub radius: f64,
    /// Rebound gain: 0.0 perfect damper, 1.0 perfect rebound, >1.0 bumper
    pub attenuation: f64,
    pub color: Color,
}

impl Obstacle {
    pub fn new(center: Point, radius: f64, attenuation: f64, color: Color) -> Self {
        Self {
            kind: ObstacleKind::Disc,
            center,
            radius,
            attenuation,
            color,
        }
    }

    /// A black disc of the default radius, as placed by a click
    pub fn disc(center: Point, attenuation: f64) -> Self {
        Self::new(center, OBSTACLE_RADIUS, attenuation, Color::BLACK)
    }
}

/// Ordered, append-only collection of obstacles
#[derive(Debug, Clone)]
pub struct ObstacleStore {
    obstacles: Vec<Obstacle>,
}

impl Default for ObstacleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleStore {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::with_capacity(STORE_INITIAL_CAPACITY),
        }
    }

    /// Append an obstacle, doubling the backing capacity when full
    pub fn insert(&mut self, obstacle: Obstacle) {
        if self.obstacles.len() == self.obstacles.capacity() {
            let extra = self.obstacles.capacity().max(STORE_INITIAL_CAPACITY);
            self.obstacles.reserve_exact(extra);
        }
        self.obstacles.push(obstacle);
    }

    /// Copy of the obstacle at `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn get(&self, index: usize) -> Obstacle {
        *self.get_ref(index)
    }

    /// Reference to the obstacle at `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn get_ref(&self, index: usize) -> &Obstacle {
        assert!(
            index < self.obstacles.len(),
            "obstacle index {index} out of range (len {})",
            self.obstacles.len()
        );
        &self.obstacles[index]
    }

    /// Mutable reference to the obstacle at `index`. Trees already built are
    /// unaffected by changes made through it.
    ///
    /// Panics if `index` is out of range.
    pub fn get_mut(&mut self, index: usize) -> &mut Obstacle {
        assert!(
            index < self.obstacles.len(),
            "obstacle index {index} out of range (len {})",
            self.obstacles.len()
        );
        &mut self.obstacles[index]
    }

    /// Overwrite the obstacle at `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn set(&mut self, index: usize, obstacle: Obstacle) {
        *self.get_mut(index) = obstacle;
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.obstacles.capacity()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }
}

impl<'a> IntoIterator for &'a ObstacleStore {
    type Item = &'a Obstacle;
    type IntoIter = std::slice::Iter<'a, Obstacle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
