//! Live heart collection
//!
//! Hearts live in a slot map behind a mutex. Spawns may arrive from any
//! thread; the maintenance pass and render snapshots take the lock only for
//! the duration of one pass, so an insert either lands before the pass or
//! after it and is never observed half-way.

use crate::heart::{Heart, HeartSprite};
use slotmap::{new_key_type, SlotMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

new_key_type! {
    /// Handle to a live heart
    pub struct HeartId;
}

/// Concurrency-safe set of in-flight hearts
#[derive(Debug, Default)]
pub struct HeartSet {
    hearts: Mutex<SlotMap<HeartId, Heart>>,
}

impl HeartSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotMap<HeartId, Heart>> {
        self.hearts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, heart: Heart) -> HeartId {
        self.lock().insert(heart)
    }

    /// Apply `tick` to every heart, then drop the finished ones
    ///
    /// Returns the number of hearts removed.
    pub fn for_each_and_prune<F>(&self, mut tick: F) -> usize
    where
        F: FnMut(&mut Heart),
    {
        let mut hearts = self.lock();
        for (_, heart) in hearts.iter_mut() {
            tick(heart);
        }
        let before = hearts.len();
        hearts.retain(|_, heart| !heart.is_finished());
        before - hearts.len()
    }

    /// Sprites of every live, visible heart
    pub fn snapshot(&self) -> Vec<HeartSprite> {
        self.lock().values().filter_map(Heart::sprite).collect()
    }

    /// Inspect a single heart
    pub fn with_heart<F, R>(&self, id: HeartId, f: F) -> Option<R>
    where
        F: FnOnce(&Heart) -> R,
    {
        self.lock().get(id).map(f)
    }

    pub fn contains(&self, id: HeartId) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every heart, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut hearts = self.lock();
        let count = hearts.len();
        hearts.clear();
        count
    }
}
