//! Background tick thread
//!
//! For hosts without a task queue of their own: a dedicated thread polls
//! the emitter whenever a tick is due. Redraw requests reach the host
//! through the emitter's needs-redraw flag and wake callback.

use crate::clock::Clock;
use crate::driver::TickOutcome;
use crate::emitter::HeartEmitter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long the thread sleeps when no tick is scheduled
const IDLE_SLEEP: Duration = Duration::from_millis(32);

/// Polls a [`HeartEmitter`] on its own thread
pub struct BackgroundTicker {
    stop_flag: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl BackgroundTicker {
    /// Start ticking `emitter` on a background thread
    pub fn start<C>(emitter: HeartEmitter<C>) -> Self
    where
        C: Clock + Clone + 'static,
    {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop_flag);

        let thread_handle = thread::spawn(move || {
            tracing::debug!("BackgroundTicker: started");
            while !thread_stop.load(Ordering::Relaxed) {
                if let TickOutcome::Finished = emitter.poll() {
                    tracing::debug!("BackgroundTicker: animation drained");
                }

                // Sleep until the next tick, re-checking the stop flag at
                // least once per idle interval
                let sleep = match emitter.next_due() {
                    Some(due) => due.saturating_sub(emitter.now()).min(IDLE_SLEEP),
                    None => IDLE_SLEEP,
                };
                if !sleep.is_zero() {
                    thread::sleep(sleep);
                }
            }
            tracing::debug!("BackgroundTicker: stopped");
        });

        Self {
            stop_flag,
            thread_handle: Some(thread_handle),
        }
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }
}

impl Drop for BackgroundTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
