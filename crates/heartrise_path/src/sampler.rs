//! Arc-length sampling
//!
//! Wraps a trajectory with its measured length so callers can ask for the
//! point at a fraction of the total distance travelled, independent of how
//! densely the curve parameter is packed along each segment.

use crate::trajectory::Trajectory;
use lyon::algorithms::measure::{PathMeasurements, SampleType};
use lyon::math::{Point, Vector};
use lyon::path::Path;

/// Flattening tolerance used when measuring trajectories
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Position and direction of travel at a point on the curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    pub position: Point,
    pub tangent: Vector,
}

/// A measured trajectory
pub struct PathSampler {
    path: Path,
    measurements: PathMeasurements,
    length: f32,
}

impl PathSampler {
    pub fn new(trajectory: &Trajectory) -> Self {
        Self::with_tolerance(trajectory, DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(trajectory: &Trajectory, tolerance: f32) -> Self {
        let path = trajectory.to_path();
        let measurements = PathMeasurements::from_path(&path, tolerance);
        let length = measurements.length();
        Self {
            path,
            measurements,
            length,
        }
    }

    /// Total arc length of the curve
    pub fn total_length(&self) -> f32 {
        self.length
    }

    /// Sample at `fraction * total_length` along the curve
    ///
    /// `fraction` is clamped into `[0, 1]`.
    pub fn sample_at(&mut self, fraction: f32) -> PathSample {
        let distance = fraction.clamp(0.0, 1.0) * self.length;
        let mut sampler = self
            .measurements
            .create_sampler(&self.path, SampleType::Distance);
        let sample = sampler.sample(distance);
        PathSample {
            position: sample.position(),
            tangent: sample.tangent(),
        }
    }
}

impl std::fmt::Debug for PathSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathSampler")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{EmissionArea, PathGenerator, WaveShape};
    use lyon::math::{point, vector};
    use rand::{rngs::StdRng, SeedableRng};

    fn approx(a: Point, b: Point, epsilon: f32) -> bool {
        (a - b).length() < epsilon
    }

    #[test]
    fn test_straight_line_length_and_midpoint() {
        // A quadratic with its control on the chord is a straight line
        let trajectory = Trajectory::builder(point(0.0, 100.0))
            .rel_quad_to(vector(0.0, -50.0), vector(0.0, -100.0))
            .build();
        let mut sampler = PathSampler::new(&trajectory);

        assert!((sampler.total_length() - 100.0).abs() < 0.01);
        let mid = sampler.sample_at(0.5);
        assert!(approx(mid.position, point(0.0, 50.0), 0.01));
        // Travelling upwards
        assert!(mid.tangent.y < 0.0);
        assert!(mid.tangent.x.abs() < 1e-3);
    }

    #[test]
    fn test_curved_length_exceeds_chord() {
        let trajectory = Trajectory::builder(point(0.0, 0.0))
            .quad_to(point(20.0, 10.0), point(0.0, 20.0))
            .build();
        let sampler = PathSampler::new(&trajectory);
        assert!(sampler.total_length() > 20.0);
    }

    #[test]
    fn test_endpoints_round_trip() {
        let generator = PathGenerator::new(WaveShape::default());
        let mut rng = StdRng::seed_from_u64(9);

        for height in [50.0, 200.0, 500.0, 1200.0] {
            let area = EmissionArea::new(80.0, height, 16.0);
            let trajectory = generator.generate(&area, &mut rng);
            let mut sampler = PathSampler::new(&trajectory);

            let start = sampler.sample_at(0.0);
            assert!(approx(start.position, area.origin(), 1e-3));

            let end = sampler.sample_at(1.0);
            assert!(end.position.y < 0.0);
            assert!(approx(end.position, trajectory.end(), 0.05));
        }
    }

    #[test]
    fn test_fraction_is_clamped() {
        let trajectory = Trajectory::builder(point(0.0, 10.0))
            .rel_quad_to(vector(0.0, -5.0), vector(0.0, -10.0))
            .build();
        let mut sampler = PathSampler::new(&trajectory);
        let below = sampler.sample_at(-1.0).position;
        let above = sampler.sample_at(2.0).position;
        assert!(approx(below, point(0.0, 10.0), 1e-3));
        assert!(approx(above, point(0.0, 0.0), 0.01));
    }

    #[test]
    fn test_vertical_progress_is_monotonic() {
        let generator = PathGenerator::default();
        let area = EmissionArea::new(80.0, 500.0, 16.0);
        let trajectory = generator.build(&area, 1.0, 1.5);
        let mut sampler = PathSampler::new(&trajectory);

        let mut last_y = f32::INFINITY;
        for step in 0..=100 {
            let y = sampler.sample_at(step as f32 / 100.0).position.y;
            assert!(y <= last_y + 1e-3);
            last_y = y;
        }
    }
}
