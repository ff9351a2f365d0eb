use std::collections::BinaryHeap;

use tilenav_core::{TilePos, WorldPos};

use crate::distance::approx_distance;
use crate::neighbors::HEURISTIC_DIRS;
use crate::path::Path;
use crate::searchgrid::{FrontierRef, HeuristicNode, NO_PARENT, SearchGrid};
use crate::traits::Walkable;

impl SearchGrid {
    /// Best-first search from `source_world` to `target_world`, built into a
    /// [`Path`] whose distance runs from the exact world source through each
    /// tile center.
    pub fn heuristic_path<W: Walkable>(
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
        let route = self.heuristic_route(walk, source, target).unwrap_or_default();
        Path::from_route(source, target, route, source_world)
    }

    /// Best-first route from `from` to `to` over 4-way steps.
    ///
    /// Nodes are popped by `cost + approx_distance(tile, to)`, ties going to
    /// the node inserted first. A tile is marked explored when it is first
    /// discovered and never enters the frontier again, even if a cheaper
    /// route to it turns up later, so the result is not guaranteed to be a
    /// shortest route. Reachability is exact.
    ///
    /// Returns the full route (including both endpoints) or `None` if the
    /// frontier runs dry.
    pub fn heuristic_route<W: Walkable>(
        &mut self,
        walk: &W,
        from: TilePos,
        to: TilePos,
    ) -> Option<Vec<TilePos>> {
        let si = self.idx(from)?;
        self.idx(to)?;

        self.next_generation();
        self.mark_visited(si);

        let mut nodes = std::mem::take(&mut self.nodes);
        nodes.clear();
        nodes.push(HeuristicNode {
            tile: from,
            cost: 0,
            from: NO_PARENT,
        });

        let mut seq: u64 = 0;
        let mut open: BinaryHeap<FrontierRef> = BinaryHeap::new();
        open.push(FrontierRef {
            node: 0,
            priority: approx_distance(from, to),
            seq,
        });

        let goal = loop {
            let Some(current) = open.pop() else {
                break None;
            };
            let here = nodes[current.node];
            if here.tile == to {
                break Some(current.node);
            }

            for dir in HEURISTIC_DIRS {
                let np = here.tile + dir;
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.is_visited(ni) || !walk.is_walkable(np) {
                    continue;
                }
                self.mark_visited(ni);

                let cost = here.cost + 1;
                nodes.push(HeuristicNode {
                    tile: np,
                    cost,
                    from: current.node,
                });
                seq += 1;
                open.push(FrontierRef {
                    node: nodes.len() - 1,
                    priority: cost + approx_distance(np, to),
                    seq,
                });
            }
        };

        let route = goal.map(|mut ni| {
            let mut route = Vec::new();
            while ni != NO_PARENT {
                route.push(nodes[ni].tile);
                ni = nodes[ni].from;
            }
            route.reverse();
            route
        });

        self.nodes = nodes;
        route
    }
}
