//! Chained quadratic trajectories
//!
//! A trajectory is a single continuous curve made of quadratic Bézier
//! segments. It is built once per particle and never mutated afterwards.

use lyon::math::{Point, Vector};
use lyon::path::Path;
use smallvec::SmallVec;

/// One quadratic Bézier segment in absolute coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadSegment {
    pub from: Point,
    pub control: Point,
    pub to: Point,
}

/// An immutable chain of quadratic segments starting at `start`
#[derive(Clone, Debug)]
pub struct Trajectory {
    start: Point,
    segments: SmallVec<[QuadSegment; 8]>,
}

impl Trajectory {
    /// Start building a trajectory at the given point
    pub fn builder(start: Point) -> TrajectoryBuilder {
        TrajectoryBuilder {
            start,
            cursor: start,
            segments: SmallVec::new(),
        }
    }

    /// The first point of the curve
    pub fn start(&self) -> Point {
        self.start
    }

    /// The last point of the curve (the start point if there are no segments)
    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.start, |s| s.to)
    }

    pub fn segments(&self) -> &[QuadSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Horizontal extent `(min_x, max_x)` of the control polygon
    ///
    /// The curve itself always lies within this range.
    pub fn lateral_bounds(&self) -> (f32, f32) {
        self.segments
            .iter()
            .fold((self.start.x, self.start.x), |(min_x, max_x), s| {
                (
                    min_x.min(s.control.x).min(s.to.x),
                    max_x.max(s.control.x).max(s.to.x),
                )
            })
    }

    /// Convert to a lyon path for measurement
    pub fn to_path(&self) -> Path {
        let mut builder = Path::builder();
        builder.begin(self.start);
        for segment in &self.segments {
            builder.quadratic_bezier_to(segment.control, segment.to);
        }
        builder.end(false);
        builder.build()
    }
}

/// Builder for [`Trajectory`]
#[derive(Clone, Debug)]
pub struct TrajectoryBuilder {
    start: Point,
    cursor: Point,
    segments: SmallVec<[QuadSegment; 8]>,
}

impl TrajectoryBuilder {
    /// Quadratic segment to an absolute point
    pub fn quad_to(mut self, control: Point, to: Point) -> Self {
        self.segments.push(QuadSegment {
            from: self.cursor,
            control,
            to,
        });
        self.cursor = to;
        self
    }

    /// Quadratic segment with control and end given relative to the current point
    pub fn rel_quad_to(self, control: Vector, to: Vector) -> Self {
        let from = self.cursor;
        self.quad_to(from + control, from + to)
    }

    pub fn build(self) -> Trajectory {
        Trajectory {
            start: self.start,
            segments: self.segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::{point, vector};

    #[test]
    fn test_relative_segments_chain() {
        let trajectory = Trajectory::builder(point(10.0, 100.0))
            .rel_quad_to(vector(-5.0, -10.0), vector(0.0, -20.0))
            .rel_quad_to(vector(5.0, -10.0), vector(0.0, -20.0))
            .build();

        assert_eq!(trajectory.len(), 2);
        let segments = trajectory.segments();
        assert_eq!(segments[0].from, point(10.0, 100.0));
        assert_eq!(segments[0].control, point(5.0, 90.0));
        assert_eq!(segments[0].to, point(10.0, 80.0));
        assert_eq!(segments[1].from, segments[0].to);
        assert_eq!(segments[1].control, point(15.0, 70.0));
        assert_eq!(trajectory.end(), point(10.0, 60.0));
    }

    #[test]
    fn test_empty_trajectory_ends_at_start() {
        let trajectory = Trajectory::builder(point(3.0, 4.0)).build();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.end(), point(3.0, 4.0));
        assert_eq!(trajectory.lateral_bounds(), (3.0, 3.0));
    }

    #[test]
    fn test_lateral_bounds_cover_controls() {
        let trajectory = Trajectory::builder(point(0.0, 0.0))
            .rel_quad_to(vector(-4.0, -1.0), vector(0.0, -2.0))
            .rel_quad_to(vector(6.0, -1.0), vector(0.0, -2.0))
            .build();
        assert_eq!(trajectory.lateral_bounds(), (-4.0, 6.0));
    }

    #[test]
    fn test_to_path_preserves_endpoints() {
        let trajectory = Trajectory::builder(point(0.0, 50.0))
            .rel_quad_to(vector(2.0, -5.0), vector(0.0, -10.0))
            .build();
        let path = trajectory.to_path();
        let endpoints: Vec<_> = path.iter().collect();
        // Begin, Quadratic, End
        assert_eq!(endpoints.len(), 3);
    }
}
