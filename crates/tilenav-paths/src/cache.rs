//! Bounded recency-ordered path cache with a per-frame unreachable memo.
//!
//! Paths are keyed by their (source, target) tiles and kept in an LRU list,
//! most recently used first. Failed searches are not cached per pair;
//! instead the region containing the target remembers the last frame on
//! which a search into it failed, so further queries into that region on the
//! same frame can be answered without searching.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;
use tilenav_core::TilePos;

use crate::path::Path;
use crate::traits::RegionId;

/// Cache key: the requested source and target tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathKey {
    pub source: TilePos,
    pub target: TilePos,
}

impl PathKey {
    #[inline]
    pub const fn new(source: TilePos, target: TilePos) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// LRU cache of computed [`Path`]s plus the region → last-failed-frame map.
pub struct PathCache {
    entries: LruCache<PathKey, Path>,
    unreachable_since: HashMap<RegionId, u32>,
}

impl PathCache {
    /// Create an empty cache holding at most `capacity` paths.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            unreachable_since: HashMap::new(),
        }
    }

    /// Maximum number of paths retained.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Number of cached paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the cache is at capacity.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Look up a path and promote it to most recently used.
    pub fn get(&mut self, key: &PathKey) -> Option<&Path> {
        self.entries.get(key)
    }

    /// Look up a path without touching its recency.
    pub fn peek(&self, key: &PathKey) -> Option<&Path> {
        self.entries.peek(key)
    }

    pub fn contains(&self, key: &PathKey) -> bool {
        self.entries.contains(key)
    }

    /// Evict the least recently used path if the cache is full.
    ///
    /// Returns the evicted key.
    pub fn make_room(&mut self) -> Option<PathKey> {
        if !self.is_full() {
            return None;
        }
        let (key, _) = self.entries.pop_lru()?;
        log::debug!("path cache: evicted {key}");
        Some(key)
    }

    /// Insert `path` as the most recently used entry, replacing any entry
    /// with the same key.
    ///
    /// If a new key arrives at capacity the least recently used path is
    /// evicted first; its key is returned.
    pub fn insert(&mut self, path: Path) -> Option<PathKey> {
        let key = path.key();
        let evicted = if self.contains(&key) {
            None
        } else {
            self.make_room()
        };
        self.entries.put(key, path);
        evicted
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &PathKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    // -----------------------------------------------------------------------
    // Unreachable-region memo
    // -----------------------------------------------------------------------

    /// Last frame on which a search into `region` failed.
    pub fn unreachable_since(&self, region: RegionId) -> Option<u32> {
        self.unreachable_since.get(&region).copied()
    }

    /// Record that a search into `region` failed on `frame`.
    ///
    /// The stored frame only moves forward.
    pub fn mark_unreachable(&mut self, region: RegionId, frame: u32) {
        let since = self.unreachable_since.entry(region).or_insert(frame);
        *since = (*since).max(frame);
    }

    /// Whether `region` is already known to be unreachable on `frame`.
    ///
    /// Frame 0 carries no timing information and never matches.
    pub fn is_known_unreachable(&self, region: RegionId, frame: u32) -> bool {
        frame > 0
            && self
                .unreachable_since(region)
                .is_some_and(|since| since >= frame)
    }

    /// Drop every cached path and every unreachable mark.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.unreachable_since.clear();
    }
}

impl fmt::Debug for PathCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("unreachable_regions", &self.unreachable_since.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(i: i32) -> PathKey {
        PathKey::new(TilePos::new(i, 0), TilePos::new(i, 1))
    }

    fn path(i: i32) -> Path {
        let k = key(i);
        Path::from_route(k.source, k.target, vec![k.source, k.target], k.source.center())
    }

    fn cache(cap: usize) -> PathCache {
        PathCache::new(NonZeroUsize::new(cap).unwrap())
    }

    #[test]
    fn insert_and_get() {
        let mut c = cache(4);
        assert!(c.is_empty());
        c.insert(path(1));
        assert_eq!(c.len(), 1);
        assert_eq!(c.get(&key(1)), Some(&path(1)));
        assert_eq!(c.get(&key(2)), None);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut c = cache(3);
        for i in 0..3 {
            assert_eq!(c.insert(path(i)), None);
        }
        assert!(c.is_full());
        // Touch 0 so that 1 becomes the oldest.
        c.get(&key(0));
        assert_eq!(c.insert(path(3)), Some(key(1)));
        assert_eq!(c.len(), 3);
        assert!(!c.contains(&key(1)));
        let order: Vec<PathKey> = c.keys().copied().collect();
        assert_eq!(order, vec![key(3), key(0), key(2)]);
    }

    #[test]
    fn peek_does_not_promote() {
        let mut c = cache(2);
        c.insert(path(0));
        c.insert(path(1));
        assert!(c.peek(&key(0)).is_some());
        assert_eq!(c.insert(path(2)), Some(key(0)));
    }

    #[test]
    fn reinsert_same_key_keeps_one_entry() {
        let mut c = cache(2);
        c.insert(path(0));
        c.insert(path(1));
        assert_eq!(c.insert(path(0)), None);
        assert_eq!(c.len(), 2);
        let order: Vec<PathKey> = c.keys().copied().collect();
        assert_eq!(order, vec![key(0), key(1)]);
    }

    #[test]
    fn make_room_only_when_full() {
        let mut c = cache(2);
        c.insert(path(0));
        assert_eq!(c.make_room(), None);
        c.insert(path(1));
        assert_eq!(c.make_room(), Some(key(0)));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn unreachable_marks_move_forward_only() {
        let mut c = cache(1);
        let r = RegionId(7);
        assert_eq!(c.unreachable_since(r), None);
        c.mark_unreachable(r, 10);
        c.mark_unreachable(r, 4);
        assert_eq!(c.unreachable_since(r), Some(10));
        c.mark_unreachable(r, 12);
        assert_eq!(c.unreachable_since(r), Some(12));
    }

    #[test]
    fn known_unreachable_is_frame_scoped() {
        let mut c = cache(1);
        let r = RegionId(1);
        c.mark_unreachable(r, 5);
        assert!(c.is_known_unreachable(r, 5));
        assert!(!c.is_known_unreachable(r, 6));
        assert!(!c.is_known_unreachable(RegionId(2), 5));

        // Frame 0 never short-circuits, even when marked on frame 0.
        c.mark_unreachable(RegionId(3), 0);
        assert!(!c.is_known_unreachable(RegionId(3), 0));
    }

    #[test]
    fn clear_resets_everything() {
        let mut c = cache(2);
        c.insert(path(0));
        c.mark_unreachable(RegionId(1), 3);
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.unreachable_since(RegionId(1)), None);
        assert_eq!(c.capacity(), 2);
    }
}
