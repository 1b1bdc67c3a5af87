use cubes_common::SimConfig;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::physics;
use crate::population::{CubePopulation, ScaleTable};
use crate::spawn;

/// Explicit simulation context: population, scale table, clock and the shared
/// rotation angle. Owned by the frame controller and lent out per tick.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    population: CubePopulation,
    scales: ScaleTable,
    /// Seconds since start or since the last statistics event.
    elapsed: f32,
    angle_degrees: f32,
    tick: u64,
}

impl Simulation {
    /// Empty population with the scale table already built.
    pub fn new(config: SimConfig) -> Self {
        let population = CubePopulation::with_capacity(config.capacity);
        let scales = ScaleTable::new(config.capacity, config.scale_base, config.scale_span);
        Self {
            config,
            population,
            scales,
            elapsed: 0.0,
            angle_degrees: 0.0,
            tick: 0,
        }
    }

    /// Population filled from a `SmallRng` seeded with `config.seed`.
    pub fn seeded(config: SimConfig) -> Self {
        let mut sim = Self::new(config);
        let mut rng = SmallRng::seed_from_u64(sim.config.seed);
        spawn::spawn_random(&mut sim.population, &mut rng, &sim.config);
        sim
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn population(&self) -> &CubePopulation {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut CubePopulation {
        &mut self.population
    }

    pub fn scales(&self) -> &ScaleTable {
        &self.scales
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance the clock by `dt`. Returns `true` when the statistics interval
    /// was exceeded, in which case the clock restarts from zero.
    pub fn advance_clock(&mut self) -> bool {
        self.tick += 1;
        self.elapsed += self.config.dt;
        if self.elapsed > self.config.stats_interval {
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    /// Add one tick of rotation and drop whole turns so the angle stays in
    /// `[0, 360)`.
    pub fn advance_rotation(&mut self) {
        let step = self.config.angular_velocity * self.config.dt;
        self.angle_degrees = wrap_degrees(wrap_degrees(self.angle_degrees) + step);
    }

    /// Camera offset along the view axis, oscillating with the clock.
    pub fn zoom_offset(&self) -> f32 {
        self.elapsed.sin() * self.config.zoom_amplitude
    }

    pub fn step_physics(&mut self) {
        physics::step(&mut self.population, self.config.dt, self.config.half_extent);
    }
}

/// Subtract the largest multiple of 360 not above `degrees`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees - (degrees / 360.0).floor() * 360.0;
    // Rounding can land exactly on 360 for inputs just below a full turn.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
