//! The [`Path`] result value and the two ways its distance is measured.

use tilenav_core::{TILE_SIZE, TilePos, WorldPos};

use crate::cache::PathKey;

/// Distance reported by every unreachable [`Path`].
pub const UNREACHABLE_DISTANCE: f64 = f64::MAX;

/// Length subtracted by [`boundary_corrected_distance`]: the two end
/// segments, one tile each, that the correction replaces.
pub const BOUNDARY_CORRECTION: f64 = 2.0 * TILE_SIZE as f64;

/// One computed route between two tiles.
///
/// A `Path` is built once by a search and then only read. When
/// [`is_reachable`](Self::is_reachable) is `false` the tile list is empty and
/// [`distance`](Self::distance) is [`UNREACHABLE_DISTANCE`]; callers must
/// check reachability before using either.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    tiles: Vec<TilePos>,
    distance: f64,
    reachable: bool,
    source: TilePos,
    target: TilePos,
}

impl Path {
    /// A path that found no route from `source` to `target`.
    pub fn unreachable(source: TilePos, target: TilePos) -> Self {
        Self {
            tiles: Vec::new(),
            distance: UNREACHABLE_DISTANCE,
            reachable: false,
            source,
            target,
        }
    }

    /// Build a path whose distance runs from the true world `start` through
    /// the center of every route tile.
    ///
    /// An empty route yields an unreachable path.
    pub(crate) fn from_route(
        source: TilePos,
        target: TilePos,
        route: Vec<TilePos>,
        start: WorldPos,
    ) -> Self {
        if route.is_empty() {
            return Self::unreachable(source, target);
        }
        debug_assert_eq!(route.first(), Some(&source));
        debug_assert_eq!(route.last(), Some(&target));
        Self {
            distance: route_distance(&route, start),
            tiles: route,
            reachable: true,
            source,
            target,
        }
    }

    /// Build a path from a flood-search route, with the end segments
    /// corrected toward the exact world endpoints.
    pub(crate) fn from_flood(
        route: Vec<TilePos>,
        source_world: WorldPos,
        target_world: WorldPos,
    ) -> Self {
        let source = source_world.tile();
        let target = target_world.tile();
        if route.is_empty() {
            return Self::unreachable(source, target);
        }
        Self {
            distance: boundary_corrected_distance(&route, source_world, target_world),
            tiles: route,
            reachable: true,
            source,
            target,
        }
    }

    /// Tiles from source to target, both inclusive.
    #[inline]
    pub fn tiles(&self) -> &[TilePos] {
        &self.tiles
    }

    /// Route length in world units.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Whether a route was found.
    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    /// The requested source tile.
    #[inline]
    pub fn source(&self) -> TilePos {
        self.source
    }

    /// The requested target tile.
    #[inline]
    pub fn target(&self) -> TilePos {
        self.target
    }

    /// Cache key of this path.
    #[inline]
    pub fn key(&self) -> PathKey {
        PathKey::new(self.source, self.target)
    }
}

/// Sum of world distances from `start` through each tile center of `route`.
pub fn route_distance(route: &[TilePos], start: WorldPos) -> f64 {
    let mut dist = 0.0;
    let mut current = start;
    for &tile in route {
        let center = tile.center();
        dist += center.distance(current);
        current = center;
    }
    dist
}

/// Tile-center length of `route`, with its first and last segments replaced
/// by the distances from the exact world endpoints to the second and
/// second-to-last tile centers.
///
/// Assumes every step of `route` is one tile long, so that the two replaced
/// segments sum to [`BOUNDARY_CORRECTION`].
pub fn boundary_corrected_distance(
    route: &[TilePos],
    source_world: WorldPos,
    target_world: WorldPos,
) -> f64 {
    if route.len() < 2 {
        return source_world.distance(target_world);
    }
    let centers: f64 = route
        .windows(2)
        .map(|w| w[0].center().distance(w[1].center()))
        .sum();
    let second = route[1].center();
    let second_to_last = route[route.len() - 2].center();
    centers + source_world.distance(second) + target_world.distance(second_to_last)
        - BOUNDARY_CORRECTION
}
