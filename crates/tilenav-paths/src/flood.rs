//! Breadth-first flood search with parent pointers.

use tilenav_core::{TilePos, WorldPos};

use crate::error::PathError;
use crate::neighbors::{FLOOD_DIRS, cuts_corner};
use crate::path::Path;
use crate::searchgrid::{NO_PARENT, SearchGrid};
use crate::traits::Walkable;

impl SearchGrid {
    /// Flood from `source_world` to `target_world` and build a [`Path`].
    ///
    /// Returns an unreachable path without searching when the two positions
    /// fall on the same tile, when either tile is [`TilePos::INVALID`], or
    /// when either lies outside the map.
    pub fn flood_path<W: Walkable>(
        &mut self,
        walk: &W,
        source_world: WorldPos,
        target_world: WorldPos,
    ) -> Path {
        let source = source_world.tile();
        let target = target_world.tile();
        if self.is_degenerate(source, target) {
            return Path::unreachable(source, target);
        }
        match self.flood_route(walk, source, target) {
            Some(route) => Path::from_flood(route, source_world, target_world),
            None => Path::unreachable(source, target),
        }
    }

    /// Whether a query between `source` and `target` has nothing to search.
    pub fn is_degenerate(&self, source: TilePos, target: TilePos) -> bool {
        source == target
            || source.is_invalid()
            || target.is_invalid()
            || !self.rng.contains(source)
            || !self.rng.contains(target)
    }

    /// Breadth-first route from `from` to `to`, both endpoints included.
    ///
    /// Steps are orthogonal, tried in [`FLOOD_DIRS`] order; a tile is entered
    /// only if it is inside the map, walkable and not yet visited. The
    /// source itself is not checked for walkability. Returns `None` if the
    /// target cannot be reached.
    pub fn flood_route<W: Walkable>(
        &mut self,
        walk: &W,
        from: TilePos,
        to: TilePos,
    ) -> Option<Vec<TilePos>> {
        let si = self.idx(from)?;
        let gi = self.idx(to)?;

        if si == gi {
            return Some(vec![from]);
        }

        self.next_generation();
        self.mark_visited(si);
        self.parents[si] = si;

        let mut queue = std::mem::take(&mut self.queue);
        queue.clear();
        queue.push_back(si);

        let found = 'search: loop {
            let Some(ci) = queue.pop_front() else {
                break 'search false;
            };
            let cp = self.point(ci);

            for dir in FLOOD_DIRS {
                let np = cp + dir;
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.is_visited(ni) || !walk.is_walkable(np) {
                    continue;
                }
                // Never fires for orthogonal steps.
                if cuts_corner(walk, cp, dir) {
                    continue;
                }
                self.mark_visited(ni);
                self.parents[ni] = ci;
                if ni == gi {
                    break 'search true;
                }
                queue.push_back(ni);
            }
        };

        queue.clear();
        self.queue = queue;

        if !found {
            return None;
        }
        match self.trace_parents(si, gi) {
            Ok(route) => Some(route),
            Err(err) => {
                log::error!("flood search {from} -> {to}: {err}");
                None
            }
        }
    }

    /// Walk parent links from `gi` back to `si` and return the route in
    /// source-to-target order.
    ///
    /// The walk is bounded by the map area; a chain that leaves the current
    /// search, dead-ends or loops is reported as
    /// [`PathError::BrokenParentChain`].
    pub(crate) fn trace_parents(&self, si: usize, gi: usize) -> Result<Vec<TilePos>, PathError> {
        let bound = self.visited.len();
        let mut route = vec![self.point(gi)];
        let mut ci = gi;

        while ci != si {
            let steps = route.len() - 1;
            let broken = PathError::BrokenParentChain {
                at: self.point(ci),
                steps,
            };
            if steps >= bound || !self.is_visited(ci) {
                return Err(broken);
            }
            let pi = self.parents[ci];
            if pi == NO_PARENT || pi >= bound {
                return Err(broken);
            }
            route.push(self.point(pi));
            ci = pi;
        }

        route.reverse();
        Ok(route)
    }
}
