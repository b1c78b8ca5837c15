//! Latency-bounded cache of anatomical frames.
//!
//! Frame construction runs on every video frame for every segment. Landmarks
//! that barely move between consecutive calls produce the same frame, so the
//! cache keys entries by frame type, view and anchor vectors quantized to
//! [`CacheParams::precision`]. Anchors carry whatever the computation reads;
//! the frame builder passes landmark visibility alongside each position. Entries live for [`CacheParams::ttl`]; when
//! the cache is full, expired entries are purged first and then the least
//! recently used entry is evicted.

use std::mem::size_of;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use biomech_types::{AnatomicalReferenceFrame, FrameType, ViewOrientation};
use hashbrown::HashMap;
use nalgebra::Vector3;
use tracing::debug;

use crate::error::Result;
use crate::params::CacheParams;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    frame_type: FrameType,
    view: Option<ViewOrientation>,
    anchors: Vec<[i64; 3]>,
}

impl CacheKey {
    #[allow(clippy::cast_possible_truncation)]
    fn new(
        frame_type: FrameType,
        view: Option<ViewOrientation>,
        anchors: &[Vector3<f64>],
        precision: f64,
    ) -> Self {
        let quantize = |c: f64| (c / precision).round() as i64;
        Self {
            frame_type,
            view,
            anchors: anchors
                .iter()
                .map(|a| [quantize(a.x), quantize(a.y), quantize(a.z)])
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    frame: AnatomicalReferenceFrame,
    inserted_at: Instant,
    last_used: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    // Returns a fresh entry and marks it used; drops it if expired.
    fn lookup(&mut self, key: &CacheKey, now: Instant, ttl: Duration) -> Option<AnatomicalReferenceFrame> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        if now.saturating_duration_since(entry.inserted_at) <= ttl {
            entry.last_used = tick;
            return Some(entry.frame);
        }
        self.entries.remove(key);
        self.evictions += 1;
        None
    }

    fn purge_expired(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.inserted_at) <= ttl);
        let purged = before - self.entries.len();
        self.evictions += purged as u64;
        purged
    }

    fn evict_lru(&mut self) -> Option<FrameType> {
        let key = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone())?;
        self.entries.remove(&key);
        self.evictions += 1;
        Some(key.frame_type)
    }

    fn memory_bytes(&self) -> usize {
        self.entries
            .keys()
            .map(|k| size_of::<CacheKey>() + size_of::<CacheEntry>() + k.anchors.len() * size_of::<[i64; 3]>())
            .sum()
    }
}

/// Diagnostic counters for a [`FrameCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// Entries removed through expiry or LRU eviction.
    pub evictions: u64,
    /// Current number of entries.
    pub entries: usize,
    /// Maximum number of entries.
    pub capacity: usize,
    /// Approximate heap and inline size of the stored entries.
    pub memory_bytes: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` before any lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe frame cache with TTL expiry and LRU eviction.
///
/// The compute closure runs outside the lock. If two threads race on the
/// same key, the value inserted first is returned to both.
///
/// # Example
///
/// ```
/// use biomech_frames::{FrameCache, FrameError};
/// use biomech_types::{AnatomicalReferenceFrame, FrameType};
/// use nalgebra::Vector3;
///
/// let cache = FrameCache::default();
/// let anchors = [Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, 0.0)];
/// let mut calls = 0;
/// for _ in 0..3 {
///     let frame = cache.get_or_compute(FrameType::Global, None, &anchors, || {
///         calls += 1;
///         AnatomicalReferenceFrame::from_primary_and_lateral(
///             FrameType::Global,
///             Vector3::zeros(),
///             Vector3::y(),
///             Vector3::z(),
///             1.0,
///         )
///         .ok_or(FrameError::Degenerate(FrameType::Global))
///     });
///     assert!(frame.is_ok());
/// }
/// assert_eq!(calls, 1);
/// ```
#[derive(Debug)]
pub struct FrameCache {
    params: CacheParams,
    state: Mutex<CacheState>,
}

impl Default for FrameCache {
    fn default() -> Self {
        Self::with_params(CacheParams::default())
    }
}

impl FrameCache {
    /// Creates a cache after validating its parameters.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FrameError::InvalidConfig`] for invalid parameters.
    pub fn new(params: CacheParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::with_params(params))
    }

    fn with_params(params: CacheParams) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(params.capacity),
                ..CacheState::default()
            }),
            params,
        }
    }

    /// Cache parameters.
    #[must_use]
    pub const fn params(&self) -> &CacheParams {
        &self.params
    }

    /// Returns the cached frame for these anchors, computing it on a miss.
    ///
    /// Failed computations are returned to the caller and not cached.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `compute`.
    pub fn get_or_compute<E, F>(
        &self,
        frame_type: FrameType,
        view: Option<ViewOrientation>,
        anchors: &[Vector3<f64>],
        compute: F,
    ) -> std::result::Result<AnatomicalReferenceFrame, E>
    where
        F: FnOnce() -> std::result::Result<AnatomicalReferenceFrame, E>,
    {
        self.get_or_compute_at(Instant::now(), frame_type, view, anchors, compute)
    }

    /// [`Self::get_or_compute`] with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `compute`.
    pub fn get_or_compute_at<E, F>(
        &self,
        now: Instant,
        frame_type: FrameType,
        view: Option<ViewOrientation>,
        anchors: &[Vector3<f64>],
        compute: F,
    ) -> std::result::Result<AnatomicalReferenceFrame, E>
    where
        F: FnOnce() -> std::result::Result<AnatomicalReferenceFrame, E>,
    {
        let key = CacheKey::new(frame_type, view, anchors, self.params.precision);
        let ttl = self.params.ttl;

        {
            let mut state = self.lock();
            if let Some(frame) = state.lookup(&key, now, ttl) {
                state.hits += 1;
                return Ok(frame);
            }
            state.misses += 1;
        }

        let frame = compute()?;

        let mut state = self.lock();
        if let Some(existing) = state.lookup(&key, now, ttl) {
            return Ok(existing);
        }
        if state.entries.len() >= self.params.capacity {
            let purged = state.purge_expired(now, ttl);
            if purged > 0 {
                debug!(purged, "purged expired frames");
            }
        }
        while state.entries.len() >= self.params.capacity {
            match state.evict_lru() {
                Some(evicted) => debug!(frame = %evicted, "evicted least recently used frame"),
                None => break,
            }
        }
        let tick = state.next_tick();
        state.entries.insert(
            key,
            CacheEntry {
                frame,
                inserted_at: now,
                last_used: tick,
            },
        );
        Ok(frame)
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            entries: state.entries.len(),
            capacity: self.params.capacity,
            memory_bytes: state.memory_bytes(),
        }
    }

    /// Number of entries, expired ones included until they are purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries and resets the counters.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.hits = 0;
        state.misses = 0;
        state.evictions = 0;
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
