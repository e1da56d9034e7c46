//! A single rising heart
//!
//! Each heart owns its measured trajectory and walks along it by a fixed
//! arc-length fraction per advance. Opacity is derived from height: hearts
//! stay opaque through the lower two thirds of the container and fade out
//! until they are 20 units from the top.

use heartrise_path::{PathSampler, Point, Trajectory, Vector};
use serde::Serialize;

/// Distance from the top at which a heart becomes fully transparent
pub const FADE_MARGIN: f32 = 20.0;

/// Opacity for a heart at height `y` in a container of `emission_height`
pub fn fade_opacity(y: f32, emission_height: f32) -> u8 {
    let band = emission_height / 3.0 - FADE_MARGIN;

    if y < FADE_MARGIN {
        0
    } else if band <= 0.0 || y > band + FADE_MARGIN {
        255
    } else {
        (y / band * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// Render-ready view of a live heart
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeartSprite {
    /// Left edge of the image
    pub x: f32,
    /// Top edge of the image
    pub y: f32,
    pub image_index: usize,
    pub opacity: u8,
}

/// One in-flight heart
#[derive(Debug)]
pub struct Heart {
    sampler: PathSampler,
    image_index: usize,
    emission_height: f32,
    step: f32,
    fraction: f32,
    /// `None` once the heart has finished
    position: Option<Point>,
    tangent: Vector,
    opacity: u8,
    advances: u32,
}

impl Heart {
    /// Create a heart at the start of `trajectory`
    ///
    /// `step` is the arc-length fraction covered by each [`advance`](Self::advance).
    pub fn new(trajectory: &Trajectory, image_index: usize, emission_height: f32, step: f32) -> Self {
        let start = trajectory.start();
        Self {
            sampler: PathSampler::new(trajectory),
            image_index,
            emission_height,
            step,
            fraction: 0.0,
            position: Some(start),
            tangent: Vector::new(0.0, -1.0),
            opacity: fade_opacity(start.y, emission_height),
            advances: 0,
        }
    }

    /// Move one step along the trajectory
    ///
    /// Returns `false` once the heart has run past the end of its path or
    /// risen above the top edge. Finished hearts are never moved again.
    pub fn advance(&mut self) -> bool {
        if self.position.is_none() {
            return false;
        }

        self.advances += 1;
        self.fraction += self.step;
        if self.fraction > 1.0 {
            self.finish();
            return false;
        }

        let sample = self.sampler.sample_at(self.fraction);
        if sample.position.y < 0.0 {
            self.finish();
            return false;
        }

        self.position = Some(sample.position);
        self.tangent = sample.tangent;
        self.opacity = fade_opacity(sample.position.y, self.emission_height);
        true
    }

    fn finish(&mut self) {
        self.position = None;
        self.opacity = 0;
    }

    pub fn is_finished(&self) -> bool {
        self.position.is_none()
    }

    /// Current top-left of the image, `None` once finished
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Direction of travel at the current position
    pub fn tangent(&self) -> Vector {
        self.tangent
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    /// Fraction of the path travelled so far
    pub fn progress(&self) -> f32 {
        self.fraction
    }

    pub fn advances(&self) -> u32 {
        self.advances
    }

    pub fn path_length(&self) -> f32 {
        self.sampler.total_length()
    }

    /// Sprite for drawing, if the heart is live and visible
    pub fn sprite(&self) -> Option<HeartSprite> {
        let position = self.position?;
        if self.opacity == 0 {
            return None;
        }
        Some(HeartSprite {
            x: position.x,
            y: position.y,
            image_index: self.image_index,
            opacity: self.opacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartrise_path::{EmissionArea, PathGenerator, WaveShape};
    use rand::{rngs::StdRng, SeedableRng};

    fn heart_in(height: f32, step: f32) -> Heart {
        let area = EmissionArea::new(80.0, height, 16.0);
        let trajectory = PathGenerator::new(WaveShape::default()).build(&area, 1.0, 1.0);
        Heart::new(&trajectory, 0, height, step)
    }

    #[test]
    fn test_fade_bands() {
        // band = 600 / 3 - 20 = 180, opaque above y = 200
        assert_eq!(fade_opacity(19.9, 600.0), 0);
        assert_eq!(fade_opacity(-5.0, 600.0), 0);
        assert_eq!(fade_opacity(200.0, 600.0), 255);
        assert_eq!(fade_opacity(450.0, 600.0), 255);
        assert_eq!(fade_opacity(90.0, 600.0), 128);
        assert_eq!(fade_opacity(180.0, 600.0), 255);
        assert_eq!(fade_opacity(20.0, 600.0), 28);
    }

    #[test]
    fn test_fade_is_monotonic() {
        let mut previous = 255;
        let mut y = 250.0_f32;
        while y >= 0.0 {
            let opacity = fade_opacity(y, 600.0);
            assert!(opacity <= previous);
            previous = opacity;
            y -= 0.5;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn test_fade_in_short_container() {
        // band is negative: opaque until the top margin
        assert_eq!(fade_opacity(25.0, 30.0), 255);
        assert_eq!(fade_opacity(10.0, 30.0), 0);
    }

    #[test]
    fn test_new_heart_sits_at_start() {
        let heart = heart_in(500.0, 0.01);
        let position = heart.position().unwrap();
        assert_eq!(position, Point::new(32.0, 484.0));
        assert_eq!(heart.opacity(), 255);
        assert!(!heart.is_finished());
        assert_eq!(heart.sprite().unwrap().image_index, 0);
    }

    #[test]
    fn test_path_length_covers_climb() {
        let heart = heart_in(500.0, 0.01);
        // Starts at y = 484 and ends above the top edge
        assert!(heart.path_length() > 484.0);
    }

    #[test]
    fn test_advance_moves_upward() {
        let mut heart = heart_in(500.0, 0.01);
        let before = heart.position().unwrap();
        assert!(heart.advance());
        let after = heart.position().unwrap();
        assert!(after.y < before.y);
        assert!(heart.tangent().y < 0.0);
        assert!((heart.progress() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_finishes_within_bound() {
        let mut rng = StdRng::seed_from_u64(3);
        let generator = PathGenerator::default();
        for (duration, speed) in [(4000.0_f32, 1.0_f32), (4000.0, 1.5), (1000.0, 2.0), (333.0, 0.7)] {
            let step = 16.0 * speed / duration;
            let bound = (duration / (16.0 * speed)).ceil() as u32;
            let area = EmissionArea::new(80.0, 500.0, 16.0);
            let mut heart = Heart::new(&generator.generate(&area, &mut rng), 0, 500.0, step);

            let mut count = 0;
            while heart.advance() {
                count += 1;
                assert!(count < bound, "still alive after {} advances", count);
            }
            assert!(heart.is_finished());
            assert!(heart.advances() <= bound);
        }
    }

    #[test]
    fn test_finished_heart_stays_finished() {
        let mut heart = heart_in(500.0, 0.6);
        assert!(heart.advance());
        assert!(!heart.advance());
        assert!(heart.is_finished());
        assert_eq!(heart.position(), None);
        assert_eq!(heart.sprite(), None);

        let advances = heart.advances();
        assert!(!heart.advance());
        assert_eq!(heart.advances(), advances);
    }

    #[test]
    fn test_exits_top_before_path_end() {
        // The path overshoots the top by 92 units, so the heart leaves
        // the visible area before its fraction reaches 1
        let mut heart = heart_in(500.0, 0.001);
        while heart.advance() {}
        assert!(heart.progress() <= 1.0);
    }

    #[test]
    fn test_invisible_heart_has_no_sprite() {
        let mut heart = heart_in(500.0, 0.001);
        let mut saw_transparent = false;
        while heart.advance() {
            if heart.opacity() == 0 {
                saw_transparent = true;
                assert_eq!(heart.sprite(), None);
            }
        }
        assert!(saw_transparent);
    }
}
