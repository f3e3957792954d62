// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Byte-bounded LRU cache of reflection images keyed by source image identity.
//!
//! Reflections are costly to build and are needed again on every frame while
//! their source stays on screen. The cache keeps the most recently used ones
//! within a byte budget and drops evicted reflections immediately, so the host's
//! handle releases its pixels as soon as the entry leaves the cache.
//!
//! ```
//! use kurbo::Size;
//! use understory_coverflow::{CoverImage, ImageId, ReflectionCache};
//!
//! #[derive(Clone, Debug)]
//! struct Img(u64, usize);
//!
//! impl CoverImage for Img {
//!     fn id(&self) -> ImageId { ImageId(self.0) }
//!     fn size(&self) -> Size { Size::new(10.0, 10.0) }
//!     fn byte_size(&self) -> usize { self.1 }
//! }
//!
//! let mut cache = ReflectionCache::new(100);
//! cache.put(ImageId(1), Img(101, 60));
//! cache.put(ImageId(2), Img(102, 60));
//!
//! // The first reflection was evicted to stay within 100 bytes.
//! assert!(cache.get(ImageId(1)).is_none());
//! assert!(cache.get(ImageId(2)).is_some());
//! ```

use lru::LruCache;

use crate::source::{CoverImage, ImageId, MemoryBudget, ReflectionRenderer};

/// The cache takes one part in this many of the available memory (about 5%).
pub const BUDGET_DIVISOR: usize = 21;

/// Counters describing cache behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing usable.
    pub misses: u64,
    /// Entries dropped to stay within the budget.
    pub evictions: u64,
    /// Current number of entries.
    pub entries: usize,
    /// Bytes currently held.
    pub used_bytes: usize,
    /// Byte budget.
    pub budget_bytes: usize,
}

#[derive(Debug)]
struct Entry<I> {
    reflection: I,
    bytes: usize,
}

/// LRU cache of reflections bounded by total byte size.
#[derive(Debug)]
pub struct ReflectionCache<I> {
    entries: LruCache<ImageId, Entry<I>>,
    budget_bytes: usize,
    used_bytes: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<I: CoverImage> ReflectionCache<I> {
    /// Creates an empty cache holding at most `budget_bytes`.
    #[must_use]
    pub fn new(budget_bytes: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            budget_bytes,
            used_bytes: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Creates a cache sized to a fraction of the memory reported by `budget`.
    #[must_use]
    pub fn with_memory_budget(budget: &impl MemoryBudget) -> Self {
        Self::new(budget.available_bytes() / BUDGET_DIVISOR)
    }

    /// Returns the cached reflection for `source`, marking it most recently used.
    pub fn get(&mut self, source: ImageId) -> Option<&I> {
        match self.entries.get(&source) {
            Some(entry) => {
                self.hits += 1;
                Some(&entry.reflection)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts the reflection for `source`, evicting least recently used entries
    /// until the cache fits its budget again.
    ///
    /// A reflection larger than the whole budget is evicted right away.
    pub fn put(&mut self, source: ImageId, reflection: I) {
        let bytes = reflection.byte_size();
        if let Some(previous) = self.entries.put(source, Entry { reflection, bytes }) {
            self.used_bytes -= previous.bytes;
        }
        self.used_bytes += bytes;
        self.trim();
    }

    /// Removes the reflection for `source`, returning it if present.
    pub fn remove(&mut self, source: ImageId) -> Option<I> {
        let entry = self.entries.pop(&source)?;
        self.used_bytes -= entry.bytes;
        Some(entry.reflection)
    }

    /// Drops every cached reflection.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(entries = self.entries.len(), "clearing reflection cache");
        }
        self.entries.clear();
        self.used_bytes = 0;
    }

    /// Returns the reflection for `image`, rendering and caching it on a miss.
    ///
    /// A cached reflection whose pixels were released by the host is discarded and
    /// rebuilt. Render failures are not cached, so the next call tries again.
    pub fn get_or_render<R>(
        &mut self,
        image: &I,
        height_fraction: f64,
        renderer: &mut R,
    ) -> Option<I>
    where
        R: ReflectionRenderer<I> + ?Sized,
    {
        if height_fraction <= 0.0 {
            return None;
        }
        let id = image.id();
        match self
            .get(id)
            .map(|cached| cached.is_usable().then(|| cached.clone()))
        {
            Some(Some(cached)) => return Some(cached),
            Some(None) => {
                tracing::trace!(source = id.0, "discarding released reflection");
                self.remove(id);
            }
            None => {}
        }
        let reflection = renderer.render(image, height_fraction)?;
        self.put(id, reflection.clone());
        Some(reflection)
    }

    /// Number of cached reflections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently held.
    #[must_use]
    pub const fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Byte budget.
    #[must_use]
    pub const fn budget_bytes(&self) -> usize {
        self.budget_bytes
    }

    /// Snapshot of the cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.entries.len(),
            used_bytes: self.used_bytes,
            budget_bytes: self.budget_bytes,
        }
    }

    fn trim(&mut self) {
        while self.used_bytes > self.budget_bytes {
            let Some((id, entry)) = self.entries.pop_lru() else {
                break;
            };
            self.used_bytes -= entry.bytes;
            self.evictions += 1;
            tracing::trace!(source = id.0, bytes = entry.bytes, "evicted reflection");
            // The cache gives up its handle here, before `put` returns.
            drop(entry);
        }
    }
}
