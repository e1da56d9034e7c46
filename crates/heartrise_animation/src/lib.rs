//! Heartrise Animation
//!
//! Rising, fading heart particles driven by a fixed-cadence tick loop.
//!
//! # Features
//!
//! - **Hearts**: Arc-length traversal of a per-heart wavy trajectory with height-based fade
//! - **Heart Set**: Thread-safe live collection with prune-after-tick maintenance
//! - **Driver**: `Idle`/`Running`/`Paused` state machine with cancellable recurring ticks
//! - **Emitter**: Host-facing configure/spawn/render/layout/lifecycle surface
//! - **Background Ticker**: Optional ticking thread for hosts without a task queue
//!
//! # Example
//!
//! ```rust
//! use heartrise_animation::{HeartConfig, HeartEmitter, HeartImages, ManualClock, TickOutcome};
//!
//! let clock = ManualClock::new();
//! let emitter = HeartEmitter::with_clock(clock.clone());
//! let images = HeartImages::hearts(16.0, &[[230, 40, 80, 255]]).unwrap();
//! emitter.configure(HeartConfig::new(16.0, 4000.0, 1.5), images).unwrap();
//! emitter.measure(500.0).unwrap();
//!
//! emitter.spawn().unwrap();
//! while let Some(due) = emitter.next_due() {
//!     clock.set(due);
//!     if let TickOutcome::Finished = emitter.poll() {
//!         break;
//!     }
//!     for sprite in emitter.render() {
//!         assert!(sprite.opacity > 0);
//!     }
//! }
//! assert_eq!(emitter.heart_count(), 0);
//! ```

pub mod assets;
pub mod clock;
pub mod config;
pub mod driver;
pub mod emitter;
pub mod error;
pub mod heart;
pub mod set;
pub mod ticker;

pub use assets::HeartImages;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::HeartConfig;
pub use driver::{AnimationDriver, CancelToken, DriverState, ScheduledTick, TickOutcome};
pub use emitter::{Bounds, HeartEmitter, WakeCallback};
pub use error::{HeartError, Result};
pub use heart::{fade_opacity, Heart, HeartSprite, FADE_MARGIN};
pub use set::{HeartId, HeartSet};
pub use ticker::BackgroundTicker;
