//! Randomized wavy trajectory generation
//!
//! Every heart gets its own curve: a chain of oscillation cycles whose
//! vertical period grows with the cycle index, so hearts accelerate their
//! sway as they climb. The first lateral excursion direction and the sway
//! amplitude are drawn per heart.

use crate::trajectory::Trajectory;
use lyon::math::{point, vector};
use rand::Rng;

/// Wave units shared by all trajectories
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveShape {
    /// Quarter-period unit `L`: cycle `i` climbs `4 * L * i`
    pub wave_length: f32,
    /// Lateral unit `R`: sway amplitude before per-heart scaling
    pub wave_range: f32,
}

impl WaveShape {
    pub fn new(wave_length: f32, wave_range: f32) -> Self {
        Self {
            wave_length,
            wave_range,
        }
    }
}

impl Default for WaveShape {
    fn default() -> Self {
        Self {
            wave_length: 24.0,
            wave_range: 8.0,
        }
    }
}

/// Geometry of the container hearts are emitted from
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EmissionArea {
    pub width: f32,
    pub height: f32,
    /// Edge length of the square heart image
    pub image_size: f32,
}

impl EmissionArea {
    pub fn new(width: f32, height: f32, image_size: f32) -> Self {
        Self {
            width,
            height,
            image_size,
        }
    }

    /// Top-left of the image at the emission point
    pub fn origin(&self) -> lyon::math::Point {
        point(
            self.width / 2.0 - self.image_size / 2.0,
            self.height - self.image_size,
        )
    }
}

/// Number of oscillation cycles needed to climb at least `height`
///
/// Cycles `1..=n` climb `2 * L * n * (n + 1)` in total, so this is the
/// smallest `n` with `sqrt(4L² + 8LH) <= 2L + 4Ln`. Degenerate input
/// yields a single cycle.
pub fn loop_count(wave_length: f32, height: f32) -> u32 {
    if !wave_length.is_finite() || !height.is_finite() || wave_length <= 0.0 || height <= 0.0 {
        return 1;
    }

    let l = f64::from(wave_length);
    let h = f64::from(height);
    let n = ((4.0 * l * l + 8.0 * l * h).sqrt() - 2.0 * l) / (4.0 * l);
    (n.ceil() as u32).max(1)
}

/// Clamp a raw amplitude draw from `[0, 4)` into the usable range
///
/// Draws below 0.5 are raised to 0.5; draws above `width / (2L)` are
/// lowered to it so the sway never leaves the container.
pub fn scale_fraction(raw: f32, width: f32, wave_length: f32) -> f32 {
    let max_fraction = if wave_length > 0.0 {
        width / 2.0 / wave_length
    } else {
        0.0
    };

    if raw < 0.5 {
        0.5
    } else if raw > max_fraction {
        max_fraction
    } else {
        raw
    }
}

/// Builds one randomized trajectory per spawn request
#[derive(Clone, Copy, Debug, Default)]
pub struct PathGenerator {
    shape: WaveShape,
}

impl PathGenerator {
    pub fn new(shape: WaveShape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    /// Cycle count for a container of the given height
    pub fn loop_count(&self, height: f32) -> u32 {
        loop_count(self.shape.wave_length, height)
    }

    /// Generate a fresh trajectory for the given emission area
    pub fn generate<R: Rng + ?Sized>(&self, area: &EmissionArea, rng: &mut R) -> Trajectory {
        let direction: f32 = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        let scale = scale_fraction(rng.gen::<f32>() * 4.0, area.width, self.shape.wave_length);
        self.build(area, direction, scale)
    }

    /// Build the trajectory for fixed draws
    ///
    /// `direction` is `-1.0` or `1.0` and picks the side of the first
    /// excursion; `scale` multiplies the lateral unit.
    pub fn build(&self, area: &EmissionArea, direction: f32, scale: f32) -> Trajectory {
        let loops = self.loop_count(area.height);
        let length = self.shape.wave_length;
        let range = self.shape.wave_range;

        if area.width <= 0.0 || area.height <= 0.0 {
            tracing::warn!(
                "Degenerate emission area {}x{}, using a single wave cycle",
                area.width,
                area.height
            );
        }

        let mut builder = Trajectory::builder(area.origin());
        for i in 1..=loops {
            let i = i as f32;
            let sway = range * scale * i * direction;
            let rise = length * i;
            builder = builder
                .rel_quad_to(vector(-sway, -rise), vector(0.0, -2.0 * rise))
                .rel_quad_to(vector(sway, -rise), vector(0.0, -2.0 * rise));
        }

        tracing::trace!(
            "Generated trajectory: {} cycles, direction {}, scale {:.2}",
            loops,
            direction,
            scale
        );
        builder.build()
    }
}
