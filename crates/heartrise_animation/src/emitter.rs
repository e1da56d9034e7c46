//! Heart emitter
//!
//! The host-facing surface: configure once, spawn hearts, poll the tick
//! driver, and read sprites back for drawing. Pause and resume map to the
//! host's lifecycle signals.
//!
//! All driver and generator state sits behind one lock, so ticks, spawns
//! and lifecycle signals never overlap even when they come from different
//! threads. The heart set has its own lock so rendering never waits on the
//! generator.

use crate::assets::HeartImages;
use crate::clock::{Clock, SystemClock};
use crate::config::HeartConfig;
use crate::driver::{AnimationDriver, DriverState, ScheduledTick, TickOutcome};
use crate::error::{HeartError, Result};
use crate::heart::{Heart, HeartSprite};
use crate::set::{HeartId, HeartSet};
use heartrise_path::{EmissionArea, PathGenerator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Callback used to wake the host when a redraw is requested
///
/// This may be invoked from a background ticker thread.
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// Container size as laid out by the host
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

/// Everything that exists only after `configure()`
struct Setup {
    config: HeartConfig,
    images: Arc<HeartImages>,
    generator: PathGenerator,
    rng: StdRng,
}

struct EmitterInner {
    setup: Option<Setup>,
    driver: AnimationDriver,
    bounds: Bounds,
}

/// Emits and animates rising hearts
pub struct HeartEmitter<C: Clock = SystemClock> {
    inner: Arc<Mutex<EmitterInner>>,
    hearts: Arc<HeartSet>,
    needs_redraw: Arc<AtomicBool>,
    wake_callback: Arc<Mutex<Option<WakeCallback>>>,
    clock: C,
}

impl HeartEmitter<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for HeartEmitter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> Clone for HeartEmitter<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            hearts: Arc::clone(&self.hearts),
            needs_redraw: Arc::clone(&self.needs_redraw),
            wake_callback: Arc::clone(&self.wake_callback),
            clock: self.clock.clone(),
        }
    }
}

impl<C: Clock> HeartEmitter<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EmitterInner {
                setup: None,
                driver: AnimationDriver::default(),
                bounds: Bounds::default(),
            })),
            hearts: Arc::new(HeartSet::new()),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            wake_callback: Arc::new(Mutex::new(None)),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, EmitterInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set a callback invoked whenever a redraw is requested
    ///
    /// Shared by every clone of this emitter, including one already handed
    /// to a [`BackgroundTicker`](crate::ticker::BackgroundTicker).
    pub fn set_wake_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self
            .wake_callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));
    }

    /// Install the animation parameters and image table
    ///
    /// Must be called before the first spawn. Fails while hearts are in
    /// flight.
    pub fn configure(&self, config: HeartConfig, images: HeartImages) -> Result<()> {
        config.validate()?;
        if images.is_empty() {
            return Err(HeartError::NoImages);
        }

        let mut inner = self.lock();
        if inner.driver.state() == DriverState::Running {
            return Err(HeartError::AnimationActive);
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        inner.driver.set_interval(config.tick_interval());
        tracing::debug!(
            "HeartEmitter configured: size {}, duration {}ms, speed {}, {} images",
            config.image_size,
            config.duration_ms,
            config.speed,
            images.len()
        );
        inner.setup = Some(Setup {
            generator: PathGenerator::new(config.wave_shape()),
            config,
            images: Arc::new(images),
            rng,
        });
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.lock().setup.is_some()
    }

    pub fn config(&self) -> Option<HeartConfig> {
        self.lock().setup.as_ref().map(|setup| setup.config.clone())
    }

    /// The image table hearts index into
    pub fn images(&self) -> Option<Arc<HeartImages>> {
        self.lock()
            .setup
            .as_ref()
            .map(|setup| Arc::clone(&setup.images))
    }

    /// Layout pass: report the desired size for a given height
    ///
    /// The emitter wants five image widths; height follows the host's
    /// constraint. The result is recorded as the container bounds.
    pub fn measure(&self, height: f32) -> Result<Bounds> {
        let mut inner = self.lock();
        let setup = inner.setup.as_ref().ok_or(HeartError::NotConfigured)?;
        let bounds = Bounds {
            width: setup.config.preferred_width(),
            height,
        };
        tracing::debug!(
            "HeartEmitter measured {}x{} ({} wave cycles)",
            bounds.width,
            bounds.height,
            setup.generator.loop_count(height)
        );
        inner.bounds = bounds;
        Ok(bounds)
    }

    /// Record the container size the host actually laid out
    pub fn set_bounds(&self, width: f32, height: f32) {
        self.lock().bounds = Bounds { width, height };
    }

    pub fn bounds(&self) -> Bounds {
        self.lock().bounds
    }

    /// Launch one heart and start ticking if idle
    ///
    /// Returns `Ok(None)` while paused: no heart is added until the host
    /// resumes.
    pub fn spawn(&self) -> Result<Option<HeartId>> {
        let mut inner = self.lock();
        let bounds = inner.bounds;
        if inner.driver.is_paused() {
            tracing::debug!("HeartEmitter: spawn ignored while paused");
            return Ok(None);
        }

        let setup = inner.setup.as_mut().ok_or(HeartError::NotConfigured)?;
        let area = EmissionArea::new(bounds.width, bounds.height, setup.config.image_size);
        let trajectory = setup.generator.generate(&area, &mut setup.rng);
        let image_index = setup.rng.gen_range(0..setup.images.len());
        let heart = Heart::new(
            &trajectory,
            image_index,
            bounds.height,
            setup.config.step_increment(),
        );
        let path_length = heart.path_length();
        let id = self.hearts.add(heart);

        if inner.driver.start(self.clock.now()) {
            tracing::debug!("HeartEmitter: started ticking");
        }
        tracing::debug!(
            "HeartEmitter: spawned heart (image {}, path {:.1}, {} live)",
            image_index,
            path_length,
            self.hearts.len()
        );
        Ok(Some(id))
    }

    /// Run the scheduled tick if it is due
    pub fn poll(&self) -> TickOutcome {
        let now = self.clock.now();
        let outcome = {
            let mut inner = self.lock();
            inner.driver.poll(now, || self.step_hearts())
        };
        if outcome.needs_redraw() {
            self.request_redraw();
        }
        outcome
    }

    /// Run a tick the host queued earlier via [`pending_tick`](Self::pending_tick)
    pub fn run_scheduled(&self, tick: &ScheduledTick) -> TickOutcome {
        let now = self.clock.now();
        let outcome = {
            let mut inner = self.lock();
            inner.driver.run(tick, now, || self.step_hearts())
        };
        if outcome.needs_redraw() {
            self.request_redraw();
        }
        outcome
    }

    fn step_hearts(&self) -> bool {
        let removed = self.hearts.for_each_and_prune(|heart| {
            heart.advance();
        });
        if removed > 0 {
            tracing::trace!("HeartEmitter: {} hearts finished", removed);
        }
        !self.hearts.is_empty()
    }

    /// The tick waiting to run, if any
    pub fn pending_tick(&self) -> Option<ScheduledTick> {
        self.lock().driver.pending().cloned()
    }

    /// When the next tick is due, on this emitter's clock
    pub fn next_due(&self) -> Option<Duration> {
        self.lock().driver.next_due()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Host lifecycle: the surface went to the background
    ///
    /// Drops every heart immediately and stops the tick loop.
    pub fn on_pause(&self) {
        let dropped = {
            let mut inner = self.lock();
            inner.driver.pause();
            self.hearts.clear()
        };
        tracing::debug!("HeartEmitter paused, dropped {} hearts", dropped);
        self.request_redraw();
    }

    /// Host lifecycle: the surface is visible again
    ///
    /// Ticking resumes with the next spawn.
    pub fn on_resume(&self) {
        self.lock().driver.resume();
        tracing::debug!("HeartEmitter resumed");
    }

    /// Sprites to draw for the current frame
    pub fn render(&self) -> Vec<HeartSprite> {
        self.hearts.snapshot()
    }

    pub fn heart_count(&self) -> usize {
        self.hearts.len()
    }

    pub fn driver_state(&self) -> DriverState {
        self.lock().driver.state()
    }

    pub fn tick_count(&self) -> u64 {
        self.lock().driver.tick_count()
    }

    /// Ask the host to redraw
    pub fn request_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Release);
        // Call outside the lock so the callback may use this emitter
        let callback = self
            .wake_callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Check and clear the redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }
}
