use tilenav_core::{Range, WorldPos};

use crate::cache::{PathCache, PathKey};
use crate::config::{PathConfig, SearchEngine};
use crate::error::PathError;
use crate::path::Path;
use crate::searchgrid::SearchGrid;
use crate::traits::{FrameClock, RegionResolver, Walkable};

/// Running counters of a [`PathService`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStats {
    /// Searches actually run by either engine.
    pub searches: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Paths dropped from the cache to make room.
    pub evictions: u64,
    /// Unit queries answered "unreachable" from the per-frame region memo.
    pub negative_hits: u64,
    /// Searches that found no route.
    pub failures: u64,
}

/// Answers path queries for one map, caching unit paths between calls.
///
/// The service owns the search scratch buffers and the [`PathCache`]; every
/// query takes `&mut self`, so cache promotion and eviction happen as one
/// step per call. Hosts that query from several threads wrap the whole
/// service in a single mutex.
pub struct PathService {
    grid: SearchGrid,
    cache: PathCache,
    engine: SearchEngine,
    stats: PathStats,
}

impl PathService {
    /// Create a service for the tiles of `map`.
    pub fn new(map: Range, config: &PathConfig) -> Result<Self, PathError> {
        let capacity = config.validate()?;
        if map.is_empty() {
            return Err(PathError::EmptyMap);
        }
        Ok(Self {
            grid: SearchGrid::new(map),
            cache: PathCache::new(capacity),
            engine: config.engine,
            stats: PathStats::default(),
        })
    }

    /// Route for a unit from `source_world` to `target_world`.
    ///
    /// 1. Degenerate queries (same tile, invalid or off-map endpoint) return
    ///    an unreachable path and touch nothing.
    /// 2. A cached path for the (source, target) tiles is returned as is and
    ///    promoted to most recently used, even if `walk` has changed since
    ///    it was cached.
    /// 3. On a miss, a full cache first evicts its least recently used path.
    /// 4. If the target's region already failed on the current frame (and
    ///    the source is walkable, and the frame is not 0), the query fails
    ///    without searching.
    /// 5. Otherwise the configured engine runs. Found paths are cached;
    ///    failures mark the target's region unreachable for this frame.
    pub fn compute_unit_path<W, R, C>(
        &mut self,
        source_world: WorldPos,
        target_world: WorldPos,
        walk: &W,
        regions: &R,
        clock: &C,
    ) -> Path
    where
        W: Walkable,
        R: RegionResolver,
        C: FrameClock,
    {
        let source = source_world.tile();
        let target = target_world.tile();
        if self.grid.is_degenerate(source, target) {
            return Path::unreachable(source, target);
        }

        let key = PathKey::new(source, target);
        if let Some(cached) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            log::trace!("path cache: hit {key}");
            return cached.clone();
        }

        self.stats.cache_misses += 1;
        if self.cache.make_room().is_some() {
            self.stats.evictions += 1;
        }

        let frame = clock.current_frame();
        let region = regions.region_of(target);
        let known_unreachable = region.is_some_and(|r| {
            walk.is_walkable(source) && self.cache.is_known_unreachable(r, frame)
        });
        if known_unreachable {
            self.stats.negative_hits += 1;
            log::debug!("path {key}: target region already unreachable on frame {frame}");
            return Path::unreachable(source, target);
        }

        self.stats.searches += 1;
        let route = match self.engine {
            SearchEngine::Flood => self.grid.flood_route(walk, source, target),
            SearchEngine::Heuristic => self.grid.heuristic_route(walk, source, target),
        };
        let path = Path::from_route(source, target, route.unwrap_or_default(), source_world);

        if path.is_reachable() {
            if self.cache.insert(path.clone()).is_some() {
                self.stats.evictions += 1;
            }
        } else {
            self.stats.failures += 1;
            if let Some(region) = region {
                log::debug!("path {key}: no route, marking {region:?} on frame {frame}");
                self.cache.mark_unreachable(region, frame);
            }
        }
        path
    }

    /// Uncached flood-search route from `source_world` to `target_world`
    /// against the current state of `walk`.
    ///
    /// Used where a stale cached route would be wrong, e.g. validating a
    /// building placement that is not committed yet.
    pub fn compute_area_path<W: Walkable>(
        &mut self,
        source_world: WorldPos,
        target_world: WorldPos,
        walk: &W,
    ) -> Path {
        if self
            .grid
            .is_degenerate(source_world.tile(), target_world.tile())
        {
            return Path::unreachable(source_world.tile(), target_world.tile());
        }
        self.stats.searches += 1;
        let path = self.grid.flood_path(walk, source_world, target_world);
        if !path.is_reachable() {
            self.stats.failures += 1;
        }
        path
    }

    /// The path cache.
    #[inline]
    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    /// Drop all cached paths and unreachable marks, e.g. after the map
    /// changed under them.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Counters since construction.
    #[inline]
    pub fn stats(&self) -> PathStats {
        self.stats
    }

    /// The engine answering unit-path cache misses.
    #[inline]
    pub fn engine(&self) -> SearchEngine {
        self.engine
    }

    /// The map range this service searches.
    #[inline]
    pub fn range(&self) -> Range {
        self.grid.range()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::path::UNREACHABLE_DISTANCE;
    use crate::regions::RegionGrid;
    use crate::traits::RegionId;
    use tilenav_core::{TILE_SIZE, TilePos, WalkGrid};

    fn t(x: i32, y: i32) -> TilePos {
        TilePos::new(x, y)
    }

    fn c(x: i32, y: i32) -> WorldPos {
        t(x, y).center()
    }

    fn service(grid: &WalkGrid, capacity: usize) -> PathService {
        PathService::new(grid.bounds(), &PathConfig::with_capacity(capacity)).unwrap()
    }

    fn no_regions(_: TilePos) -> Option<RegionId> {
        None
    }

    /// Two rooms split by a wall at x = 4.
    fn split_map() -> WalkGrid {
        WalkGrid::parse(
            "
            ....#....
            ....#....
            ....#....
            ",
        )
        .unwrap()
    }

    #[test]
    fn construction_errors() {
        let grid = WalkGrid::new(4, 4);
        assert_eq!(
            PathService::new(grid.bounds(), &PathConfig::with_capacity(0)).err(),
            Some(PathError::ZeroCapacity)
        );
        assert_eq!(
            PathService::new(Range::sized(0, 5), &PathConfig::default()).err(),
            Some(PathError::EmptyMap)
        );
    }

    #[test]
    fn area_path_open_row() {
        let grid = WalkGrid::new(5, 5);
        let mut svc = service(&grid, 8);
        let path = svc.compute_area_path(c(0, 0), c(4, 0), &grid);
        assert!(path.is_reachable());
        assert_eq!(path.tiles(), &[t(0, 0), t(1, 0), t(2, 0), t(3, 0), t(4, 0)]);
        assert_eq!(svc.stats().searches, 1);
        // Area paths never enter the cache.
        assert!(svc.cache().is_empty());
    }

    #[test]
    fn area_path_is_deterministic() {
        let grid = split_map();
        let mut svc = service(&grid, 8);
        let a = svc.compute_area_path(WorldPos::new(3, 70), WorldPos::new(100, 5), &grid);
        let b = svc.compute_area_path(WorldPos::new(3, 70), WorldPos::new(100, 5), &grid);
        assert!(a.is_reachable());
        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.distance().to_bits(), b.distance().to_bits());
        assert_eq!(svc.stats().searches, 2);
    }

    #[test]
    fn area_path_full_obstruction() {
        let grid = split_map();
        let mut svc = service(&grid, 8);
        let path = svc.compute_area_path(c(0, 1), c(8, 1), &grid);
        assert!(!path.is_reachable());
        assert!(path.tiles().is_empty());
        assert_eq!(path.distance(), UNREACHABLE_DISTANCE);
        assert_eq!(svc.stats().failures, 1);
    }

    #[test]
    fn area_path_sees_current_grid() {
        let mut grid = WalkGrid::new(5, 5);
        let mut svc = service(&grid, 8);
        assert!(svc.compute_area_path(c(0, 2), c(4, 2), &grid).is_reachable());
        grid.fill(Range::new(2, 0, 3, 5), false);
        assert!(!svc.compute_area_path(c(0, 2), c(4, 2), &grid).is_reachable());
    }

    #[test]
    fn second_unit_query_is_a_cache_hit() {
        let grid = WalkGrid::new(6, 6);
        let mut svc = service(&grid, 8);
        let first = svc.compute_unit_path(c(0, 0), c(5, 3), &grid, &no_regions, &1u32);
        let second = svc.compute_unit_path(c(0, 0), c(5, 3), &grid, &no_regions, &1u32);
        assert!(first.is_reachable());
        assert_eq!(first, second);
        let stats = svc.stats();
        assert_eq!(stats.searches, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
    }

    #[test]
    fn unit_path_distance_runs_from_world_source() {
        let grid = WalkGrid::new(6, 1);
        let mut svc = service(&grid, 8);
        // Left edge of tile 0: half a tile to its center, then 3 tiles.
        let path = svc.compute_unit_path(
            WorldPos::new(0, 16),
            c(3, 0),
            &grid,
            &no_regions,
            &1u32,
        );
        assert_eq!(path.tiles().len(), 4);
        assert_eq!(path.distance(), 3.5 * f64::from(TILE_SIZE));
    }

    #[test]
    fn sub_tile_positions_share_a_cache_entry() {
        let grid = WalkGrid::new(6, 6);
        let mut svc = service(&grid, 8);
        svc.compute_unit_path(WorldPos::new(1, 1), c(4, 4), &grid, &no_regions, &1u32);
        let hit = svc.compute_unit_path(WorldPos::new(30, 30), c(4, 4), &grid, &no_regions, &1u32);
        assert!(hit.is_reachable());
        assert_eq!(svc.stats().searches, 1);
        assert_eq!(svc.cache().len(), 1);
    }

    #[test]
    fn cached_path_survives_grid_change() {
        let mut grid = WalkGrid::new(5, 5);
        let mut svc = service(&grid, 8);
        let before = svc.compute_unit_path(c(0, 2), c(4, 2), &grid, &no_regions, &1u32);
        grid.fill(Range::new(2, 0, 3, 5), false);
        let after = svc.compute_unit_path(c(0, 2), c(4, 2), &grid, &no_regions, &1u32);
        assert_eq!(before, after);
        assert!(after.is_reachable());

        svc.clear_cache();
        let fresh = svc.compute_unit_path(c(0, 2), c(4, 2), &grid, &no_regions, &1u32);
        assert!(!fresh.is_reachable());
        assert_eq!(svc.stats().searches, 2);
    }

    #[test]
    fn lru_eviction_of_oldest_key() {
        let grid = WalkGrid::new(8, 8);
        let mut svc = service(&grid, 3);
        let query = |svc: &mut PathService, k: i32| {
            svc.compute_unit_path(c(0, 0), c(k, 7), &grid, &no_regions, &1u32)
        };
        for k in 1..=3 {
            query(&mut svc, k);
        }
        assert!(svc.cache().is_full());

        query(&mut svc, 4);
        let key = |k: i32| PathKey::new(t(0, 0), t(k, 7));
        assert!(!svc.cache().contains(&key(1)));
        for k in 2..=4 {
            assert!(svc.cache().contains(&key(k)));
        }
        assert_eq!(svc.stats().evictions, 1);

        // The evicted key is a miss again and pushes out the next oldest.
        query(&mut svc, 1);
        assert_eq!(svc.stats().searches, 5);
        assert!(!svc.cache().contains(&key(2)));
    }

    #[test]
    fn hit_promotes_entry() {
        let grid = WalkGrid::new(8, 8);
        let mut svc = service(&grid, 2);
        svc.compute_unit_path(c(0, 0), c(1, 7), &grid, &no_regions, &1u32);
        svc.compute_unit_path(c(0, 0), c(2, 7), &grid, &no_regions, &1u32);
        // Touch the older entry, then add a third.
        svc.compute_unit_path(c(0, 0), c(1, 7), &grid, &no_regions, &1u32);
        svc.compute_unit_path(c(0, 0), c(3, 7), &grid, &no_regions, &1u32);
        assert!(svc.cache().contains(&PathKey::new(t(0, 0), t(1, 7))));
        assert!(!svc.cache().contains(&PathKey::new(t(0, 0), t(2, 7))));
    }

    #[test]
    fn miss_evicts_even_when_search_fails() {
        let grid = split_map();
        let mut svc = service(&grid, 1);
        svc.compute_unit_path(c(0, 0), c(3, 2), &grid, &no_regions, &1u32);
        assert_eq!(svc.cache().len(), 1);
        let failed = svc.compute_unit_path(c(0, 0), c(8, 0), &grid, &no_regions, &1u32);
        assert!(!failed.is_reachable());
        // Failures are not cached, and the old entry was already evicted.
        assert!(svc.cache().is_empty());
        assert_eq!(svc.stats().evictions, 1);
    }

    #[test]
    fn negative_cache_suppresses_same_frame() {
        let grid = split_map();
        let regions = RegionGrid::label(grid.bounds(), &grid);
        let mut svc = service(&grid, 8);
        let right = regions.region_of(t(8, 0)).unwrap();

        let first = svc.compute_unit_path(c(0, 0), c(8, 0), &grid, &regions, &5u32);
        assert!(!first.is_reachable());
        assert_eq!(svc.stats().searches, 1);
        assert_eq!(svc.cache().unreachable_since(right), Some(5));

        // A different source into the same region, same frame: no search.
        let second = svc.compute_unit_path(c(1, 2), c(6, 1), &grid, &regions, &5u32);
        assert!(!second.is_reachable());
        assert_eq!(second.distance(), UNREACHABLE_DISTANCE);
        assert_eq!(svc.stats().searches, 1);
        assert_eq!(svc.stats().negative_hits, 1);

        // Next frame searches again and moves the mark forward.
        svc.compute_unit_path(c(1, 2), c(6, 1), &grid, &regions, &6u32);
        assert_eq!(svc.stats().searches, 2);
        assert_eq!(svc.cache().unreachable_since(right), Some(6));
    }

    #[test]
    fn negative_cache_ignores_frame_zero() {
        let grid = split_map();
        let regions = RegionGrid::label(grid.bounds(), &grid);
        let mut svc = service(&grid, 8);
        svc.compute_unit_path(c(0, 0), c(8, 0), &grid, &regions, &0u32);
        svc.compute_unit_path(c(0, 1), c(8, 1), &grid, &regions, &0u32);
        assert_eq!(svc.stats().searches, 2);
        assert_eq!(svc.stats().negative_hits, 0);
    }

    #[test]
    fn negative_cache_requires_walkable_source() {
        let mut grid = split_map();
        let regions = RegionGrid::label(grid.bounds(), &grid);
        grid.set(t(0, 2), false);
        let mut svc = service(&grid, 8);
        svc.compute_unit_path(c(0, 0), c(8, 0), &grid, &regions, &3u32);
        // Source (0,2) is blocked: the memo is not consulted.
        svc.compute_unit_path(c(0, 2), c(8, 0), &grid, &regions, &3u32);
        assert_eq!(svc.stats().searches, 2);
    }

    #[test]
    fn unresolved_target_region_is_not_marked() {
        let grid = split_map();
        let mut svc = service(&grid, 8);
        let regions = |p: TilePos| (p.x < 4).then_some(RegionId(0));
        svc.compute_unit_path(c(0, 0), c(8, 0), &grid, &regions, &2u32);
        svc.compute_unit_path(c(0, 1), c(8, 0), &grid, &regions, &2u32);
        assert_eq!(svc.stats().searches, 2);
        assert_eq!(svc.cache().unreachable_since(RegionId(0)), None);
    }

    #[test]
    fn memo_ignores_which_source_failed() {
        let grid = split_map();
        let regions = RegionGrid::label(grid.bounds(), &grid);
        let mut svc = service(&grid, 8);
        svc.compute_unit_path(c(0, 0), c(8, 0), &grid, &regions, &4u32);
        // The right room is reachable from inside it, but the mark is per
        // region, so on the same frame this query still fails.
        let inside = svc.compute_unit_path(c(5, 0), c(8, 2), &grid, &regions, &4u32);
        assert!(!inside.is_reachable());
        assert_eq!(svc.stats().negative_hits, 1);
        // One frame later it is found and cached.
        let later = svc.compute_unit_path(c(5, 0), c(8, 2), &grid, &regions, &5u32);
        assert!(later.is_reachable());
        assert_eq!(svc.cache().len(), 1);
    }

    #[test]
    fn degenerate_queries_do_not_search() {
        let grid = WalkGrid::new(4, 4);
        let mut svc = service(&grid, 8);
        let same = svc.compute_unit_path(WorldPos::new(2, 2), WorldPos::new(20, 9), &grid, &no_regions, &1u32);
        assert!(!same.is_reachable());
        let invalid = svc.compute_unit_path(c(0, 0), TilePos::INVALID.center(), &grid, &no_regions, &1u32);
        assert!(!invalid.is_reachable());
        let area = svc.compute_area_path(c(1, 1), c(1, 1), &grid);
        assert!(!area.is_reachable());
        assert_eq!(svc.stats(), PathStats::default());
        assert!(svc.cache().is_empty());
    }

    #[test]
    fn flood_engine_for_unit_paths() {
        let grid = WalkGrid::new(5, 5);
        let cfg = PathConfig::with_capacity(4).engine(SearchEngine::Flood);
        let mut svc = PathService::new(grid.bounds(), &cfg).unwrap();
        assert_eq!(svc.engine(), SearchEngine::Flood);
        let path = svc.compute_unit_path(c(0, 0), c(1, 1), &grid, &no_regions, &1u32);
        // Flood breaks ties downward first.
        assert_eq!(path.tiles(), &[t(0, 0), t(0, 1), t(1, 1)]);
        assert_eq!(path.distance(), 2.0 * f64::from(TILE_SIZE));
    }

    #[test]
    fn clock_may_be_a_closure() {
        let grid = split_map();
        let regions = RegionGrid::label(grid.bounds(), &grid);
        let mut svc = service(&grid, 8);
        let frame = Cell::new(1u32);
        let clock = || frame.get();

        for tick in 1..=3 {
            frame.set(tick);
            // Three units per tick try to reach the sealed room.
            for y in 0..3 {
                let p = svc.compute_unit_path(c(0, y), c(7, y), &grid, &regions, &clock);
                assert!(!p.is_reachable());
            }
        }
        // One real search per tick; the rest come from the memo.
        assert_eq!(svc.stats().searches, 3);
        assert_eq!(svc.stats().negative_hits, 6);
    }
}
