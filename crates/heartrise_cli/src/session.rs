//! Headless animation sessions
//!
//! Runs an emitter on virtual time: hearts launch on the configured
//! schedule and the clock jumps straight to the next due tick or launch, so
//! a full session completes instantly and reproducibly.

use crate::config::SessionConfig;
use anyhow::{Context, Result};
use heartrise_animation::{
    Bounds, Clock, HeartEmitter, HeartImages, HeartSprite, ManualClock, TickOutcome,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// One redraw of the emitter
#[derive(Debug, Serialize)]
pub struct Frame {
    pub index: u64,
    pub time_ms: u64,
    pub sprites: Vec<HeartSprite>,
}

/// Totals for a finished session
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub spawned: u32,
    pub ticks: u64,
    pub frames: u64,
    pub peak_hearts: usize,
    pub elapsed_ms: u64,
    pub truncated: bool,
}

/// A configured emitter ready to run
pub struct Session {
    emitter: HeartEmitter<ManualClock>,
    clock: ManualClock,
    bounds: Bounds,
    images: Arc<HeartImages>,
    spawn_count: u32,
    spawn_interval: Duration,
    max_ticks: u64,
}

impl Session {
    /// Configure an emitter from `config`; relative image paths resolve against `base`
    pub fn new(config: &SessionConfig, base: &Path) -> Result<Self> {
        let images = config.images.load(base, config.hearts.image_size)?;
        let clock = ManualClock::new();
        let emitter = HeartEmitter::with_clock(clock.clone());
        emitter
            .configure(config.hearts.clone(), images)
            .context("Invalid [hearts] configuration")?;

        let mut bounds = emitter.measure(config.container.height)?;
        if let Some(width) = config.container.width {
            emitter.set_bounds(width, config.container.height);
            bounds.width = width;
        }

        let images = emitter
            .images()
            .context("Emitter lost its image table after configure")?;

        Ok(Self {
            emitter,
            clock,
            bounds,
            images,
            spawn_count: config.run.spawn_count,
            spawn_interval: Duration::from_millis(config.run.spawn_interval_ms),
            max_ticks: config.run.max_ticks,
        })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn images(&self) -> &HeartImages {
        &self.images
    }

    /// Run to completion, handing every redraw to `on_frame`
    pub fn run<F>(&self, mut on_frame: F) -> Result<SessionSummary>
    where
        F: FnMut(&Frame) -> Result<()>,
    {
        let mut summary = SessionSummary::default();
        let mut next_spawn = Duration::ZERO;
        let mut launches = 0;

        loop {
            let now = self.clock.now();

            while launches < self.spawn_count && next_spawn <= now {
                if self.emitter.spawn()?.is_some() {
                    summary.spawned += 1;
                }
                launches += 1;
                next_spawn += self.spawn_interval;
            }
            summary.peak_hearts = summary.peak_hearts.max(self.emitter.heart_count());

            let outcome = self.emitter.poll();
            if matches!(outcome, TickOutcome::Continue { .. } | TickOutcome::Finished) {
                summary.ticks += 1;
            }

            if self.emitter.take_needs_redraw() {
                let frame = Frame {
                    index: summary.frames,
                    time_ms: now.as_millis() as u64,
                    sprites: self.emitter.render(),
                };
                on_frame(&frame)?;
                summary.frames += 1;
            }

            if summary.ticks >= self.max_ticks {
                tracing::warn!("Stopping after {} ticks (run.max_ticks)", summary.ticks);
                summary.truncated = true;
                break;
            }

            let pending_spawn = (launches < self.spawn_count).then_some(next_spawn);
            let next = match (self.emitter.next_due(), pending_spawn) {
                (Some(due), Some(spawn)) => due.min(spawn),
                (Some(due), None) => due,
                (None, Some(spawn)) => spawn,
                (None, None) => break,
            };
            self.clock.set(next.max(now));
        }

        summary.elapsed_ms = self.clock.now().as_millis() as u64;
        tracing::info!(
            "Session done: {} hearts, {} ticks, {} frames, peak {} live, {}ms",
            summary.spawned,
            summary.ticks,
            summary.frames,
            summary.peak_hearts,
            summary.elapsed_ms
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartrise_animation::HeartConfig;

    fn config(spawn_count: u32) -> SessionConfig {
        let mut config = SessionConfig::default();
        config.hearts = HeartConfig::new(16.0, 4000.0, 1.5).with_seed(21);
        config.run.spawn_count = spawn_count;
        config
    }

    #[test]
    fn test_single_heart_session() {
        let session = Session::new(&config(1), Path::new(".")).unwrap();
        assert_eq!(session.bounds(), Bounds { width: 80.0, height: 500.0 });

        let mut frames = Vec::new();
        let summary = session
            .run(|frame| {
                frames.push(frame.sprites.len());
                Ok(())
            })
            .unwrap();

        assert_eq!(summary.spawned, 1);
        assert!(summary.ticks > 0 && summary.ticks <= 167);
        assert_eq!(summary.frames, summary.ticks);
        assert_eq!(summary.peak_hearts, 1);
        assert!(!summary.truncated);
        // The last redraw happens after the heart is gone
        assert_eq!(frames.last(), Some(&0));
    }

    #[test]
    fn test_staggered_spawns_overlap() {
        let session = Session::new(&config(4), Path::new(".")).unwrap();
        let summary = session.run(|_| Ok(())).unwrap();
        assert_eq!(summary.spawned, 4);
        assert!(summary.peak_hearts > 1);
        // Last spawn at 900ms, so the session outlives it
        assert!(summary.elapsed_ms > 900);
    }

    #[test]
    fn test_max_ticks_truncates() {
        let mut config = config(3);
        config.run.max_ticks = 10;
        let session = Session::new(&config, Path::new(".")).unwrap();
        let summary = session.run(|_| Ok(())).unwrap();
        assert!(summary.truncated);
        assert_eq!(summary.ticks, 10);
    }

    #[test]
    fn test_frame_errors_abort() {
        let session = Session::new(&config(1), Path::new(".")).unwrap();
        let result = session.run(|_| anyhow::bail!("disk full"));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_width() {
        let mut config = config(1);
        config.container.width = Some(120.0);
        let session = Session::new(&config, Path::new(".")).unwrap();
        assert_eq!(session.bounds().width, 120.0);
    }
}
