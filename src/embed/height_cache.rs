//! Last-observed heights of social-post frames
//!
//! Written by the resize listener, read when a post frame is rendered so it
//! starts at its final height. Bounded LRU; losing an entry only costs one
//! layout shift.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

/// Post id → frame height (px), least recently used entries evicted first.
#[derive(Debug)]
pub struct EmbedHeightCache {
    inner: Mutex<LruCache<String, u32>>,
}

impl EmbedHeightCache {
    /// Create a cache holding at most `capacity` entries (minimum one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, post_id: &str) -> Option<u32> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(post_id)
            .copied()
    }

    pub fn record(&self, post_id: &str, height_px: u32) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(post_id.to_string(), height_px);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cap()
            .get()
    }
}

impl Default for EmbedHeightCache {
    fn default() -> Self {
        Self::new(crate::config::Settings::DEFAULT_HEIGHT_CACHE_CAPACITY)
    }
}
