//! Heartrise Paths
//!
//! Trajectory construction and sampling for rising heart particles.
//!
//! # Features
//!
//! - **Trajectories**: Chained quadratic Bézier segments built from relative moves
//! - **Generator**: One randomized wavy path per particle, anchored to the emission area
//! - **Sampler**: Arc-length measurement with position/tangent lookup by fraction
//!
//! # Example
//!
//! ```rust
//! use heartrise_path::{EmissionArea, PathGenerator, PathSampler, WaveShape};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let generator = PathGenerator::new(WaveShape::default());
//! let area = EmissionArea::new(80.0, 500.0, 16.0);
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let trajectory = generator.generate(&area, &mut rng);
//! let mut sampler = PathSampler::new(&trajectory);
//!
//! let first = sampler.sample_at(0.0).position;
//! assert!((first - trajectory.start()).length() < 1e-3);
//! assert!(sampler.sample_at(1.0).position.y < 0.0);
//! ```

pub mod generator;
pub mod sampler;
pub mod trajectory;

pub use generator::{loop_count, scale_fraction, EmissionArea, PathGenerator, WaveShape};
pub use sampler::{PathSample, PathSampler, DEFAULT_TOLERANCE};
pub use trajectory::{QuadSegment, Trajectory, TrajectoryBuilder};

pub use lyon::math::{point, vector, Point, Vector};
