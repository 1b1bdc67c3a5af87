use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::RenderFlags;

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("cube capacity must be at least 1")]
    ZeroCapacity,
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
    #[error("bounding half-extent must be finite and positive, got {0}")]
    InvalidBounds(f32),
    #[error("statistics interval must be positive, got {0}")]
    InvalidStatsInterval(f32),
    #[error("max speed must be finite and non-negative, got {0}")]
    InvalidMaxSpeed(f32),
    #[error("radius range must be finite with min <= max, got ({0}, {1})")]
    InvalidRadiusRange(f32, f32),
}

/// Simulation parameters. Defaults reproduce the stock demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed number of population slots.
    pub capacity: usize,
    /// Logical timestep per tick.
    pub dt: f32,
    /// Half-extent of the reflective bounding box.
    pub half_extent: f32,
    /// Largest absolute velocity component at spawn.
    pub max_speed: f32,
    /// Radius range recorded at spawn.
    pub radius_range: (f32, f32),
    pub scale_base: f32,
    pub scale_span: f32,
    /// Elapsed time after which a statistics event fires.
    pub stats_interval: f32,
    /// Degrees per time unit.
    pub angular_velocity: f32,
    pub zoom_amplitude: f32,
    pub camera_distance: f32,
    pub seed: u64,
    pub flags: RenderFlags,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: 350,
            dt: 1.0 / 60.0,
            half_extent: 3.0,
            max_speed: 2.0,
            radius_range: (0.1, 0.5),
            scale_base: 0.05,
            scale_span: 0.35,
            stats_interval: 10.0,
            angular_velocity: 50.0,
            zoom_amplitude: 5.0,
            camera_distance: 3.0,
            seed: 42,
            flags: RenderFlags::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimestep(self.dt));
        }
        if !(self.half_extent.is_finite() && self.half_extent > 0.0) {
            return Err(ConfigError::InvalidBounds(self.half_extent));
        }
        if !(self.stats_interval > 0.0) {
            return Err(ConfigError::InvalidStatsInterval(self.stats_interval));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(ConfigError::InvalidMaxSpeed(self.max_speed));
        }
        let (lo, hi) = self.radius_range;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(ConfigError::InvalidRadiusRange(lo, hi));
        }
        Ok(())
    }
}

/// Fixed viewport and projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub up: Vec3,
    /// Clear color while drawing indexed.
    pub clear_indexed: [f32; 4],
    /// Clear color while drawing from array order.
    pub clear_arrays: [f32; 4],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            up: Vec3::Y,
            clear_indexed: [0.0, 0.0, 0.3, 1.0],
            clear_arrays: [0.3, 0.0, 0.3, 1.0],
        }
    }
}

impl ViewConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
