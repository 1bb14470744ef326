//! Simulation settings
//!
//! Loaded from a JSON file by the runner. Every field has a default, so a
//! settings file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::Fountain;

/// An obstacle placed at startup, as if clicked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    pub center: [f64; 2],
    /// Rebound gain (the original slider ranged 0.0 to 3.0)
    pub attenuation: f64,
    /// Falls back to [`Settings::obstacle_radius`]
    #[serde(default)]
    pub radius: Option<f64>,
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed physics timestep (seconds)
    pub timestep: f64,
    /// Presentation refresh period (seconds)
    pub display_period: f64,
    /// Statistics reporting period (seconds)
    pub stats_period: f64,
    /// Radius of the obstacle query around each predicted position
    pub query_margin: f64,
    /// Half-width of the square particles may live in
    pub domain_bound: f64,
    /// Uniform gravity acceleration
    pub gravity: [f64; 2],
    /// Radius of placed obstacles
    pub obstacle_radius: f64,
    /// RNG seed for the fountains
    pub seed: u64,
    /// Simulated seconds the headless runner advances
    pub duration: f64,
    pub fountains: Vec<Fountain>,
    pub obstacles: Vec<ObstaclePlacement>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timestep: SIM_DT,
            display_period: DISPLAY_DT,
            stats_period: STATS_DT,
            query_margin: QUERY_MARGIN,
            domain_bound: DOMAIN_BOUND,
            gravity: GRAVITY,
            obstacle_radius: OBSTACLE_RADIUS,
            seed: 0x5eed,
            duration: 10.0,
            fountains: Fountain::defaults(),
            obstacles: Vec::new(),
        }
    }
}

impl Settings {
    pub fn gravity(&self) -> Point {
        Point::from_array(self.gravity)
    }

    /// Parse settings from JSON text and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("timestep", self.timestep),
            ("display_period", self.display_period),
            ("stats_period", self.stats_period),
            ("query_margin", self.query_margin),
            ("domain_bound", self.domain_bound),
            ("obstacle_radius", self.obstacle_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{name} must be finite and > 0, got {value}")));
            }
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(invalid(format!("duration must be >= 0, got {}", self.duration)));
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(invalid("gravity must be finite".into()));
        }

        for (i, f) in self.fountains.iter().enumerate() {
            if !(0.0..=1.0).contains(&f.probability) {
                return Err(invalid(format!("fountain {i}: probability must be in [0, 1]")));
            }
            if !f.mass.is_finite() || f.mass <= 0.0 {
                return Err(invalid(format!("fountain {i}: mass must be > 0")));
            }
            if !f.variance.is_finite() || f.variance < 0.0 {
                return Err(invalid(format!("fountain {i}: variance must be >= 0")));
            }
        }

        for (i, o) in self.obstacles.iter().enumerate() {
            if !o.center.iter().all(|c| c.is_finite()) {
                return Err(invalid(format!("obstacle {i}: center must be finite")));
            }
            if !o.attenuation.is_finite() || o.attenuation < 0.0 {
                return Err(invalid(format!("obstacle {i}: attenuation must be >= 0")));
            }
            if let Some(r) = o.radius
                && (!r.is_finite() || r <= 0.0)
            {
                return Err(invalid(format!("obstacle {i}: radius must be > 0")));
            }
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidSettings(msg)
}
