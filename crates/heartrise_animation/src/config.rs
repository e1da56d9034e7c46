//! Animation parameters
//!
//! Set once before the first spawn and read-only while hearts are in flight.

use crate::error::{HeartError, Result};
use heartrise_path::WaveShape;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Process-wide parameters for heart animations
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HeartConfig {
    /// Edge length of the square heart image
    pub image_size: f32,
    /// Flight time of a single heart at speed 1.0, in milliseconds
    pub duration_ms: f32,
    /// Speed multiplier applied to every advance
    pub speed: f32,
    /// Quarter-period wave unit
    pub wave_length: f32,
    /// Lateral wave unit
    pub wave_range: f32,
    /// Delay between driver ticks
    pub tick_interval_ms: u64,
    /// Time quantum credited to each advance
    ///
    /// This is independent of `tick_interval_ms`: with the defaults each
    /// 32ms tick moves hearts by a 16ms share of their flight.
    pub frame_step_ms: f32,
    /// Seed for reproducible trajectories
    pub seed: Option<u64>,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            image_size: 16.0,
            duration_ms: 4000.0,
            speed: 1.0,
            wave_length: 24.0,
            wave_range: 8.0,
            tick_interval_ms: 32,
            frame_step_ms: 16.0,
            seed: None,
        }
    }
}

impl HeartConfig {
    /// Create a configuration with the three commonly tuned parameters
    pub fn new(image_size: f32, duration_ms: f32, speed: f32) -> Self {
        Self {
            image_size,
            duration_ms,
            speed,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_wave(mut self, wave_length: f32, wave_range: f32) -> Self {
        self.wave_length = wave_length;
        self.wave_range = wave_range;
        self
    }

    pub fn with_tick_interval(mut self, millis: u64) -> Self {
        self.tick_interval_ms = millis;
        self
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("image_size", self.image_size),
            ("duration_ms", self.duration_ms),
            ("speed", self.speed),
            ("wave_length", self.wave_length),
            ("wave_range", self.wave_range),
            ("frame_step_ms", self.frame_step_ms),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(HeartError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(HeartError::InvalidConfig(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Fraction of the path covered by one advance
    pub fn step_increment(&self) -> f32 {
        self.frame_step_ms * self.speed / self.duration_ms
    }

    /// Advances needed before a heart is guaranteed to finish
    pub fn max_advances(&self) -> u32 {
        (self.duration_ms / (self.frame_step_ms * self.speed)).ceil() as u32
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn wave_shape(&self) -> WaveShape {
        WaveShape::new(self.wave_length, self.wave_range)
    }

    /// Width a host should reserve for the emitter
    pub fn preferred_width(&self) -> f32 {
        self.image_size * 5.0
    }
}
