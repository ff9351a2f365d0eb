//! Region labelling of a walkability grid.

use tilenav_core::{Range, TilePos};

use crate::traits::{RegionId, RegionResolver, Walkable};

/// Connected walkable components of a map, usable as a [`RegionResolver`].
///
/// Two walkable tiles share a region when a 4-way walk connects them.
/// Blocked tiles and tiles outside the map have no region.
#[derive(Clone, Debug)]
pub struct RegionGrid {
    rng: Range,
    width: usize,
    labels: Vec<Option<RegionId>>,
    count: usize,
}

impl RegionGrid {
    /// Label every walkable tile of `rng` with its component.
    ///
    /// Components are numbered from 0 in row-major order of their first
    /// tile.
    pub fn label<W: Walkable>(rng: Range, walk: &W) -> Self {
        let width = rng.width().max(0) as usize;
        let mut grid = Self {
            rng,
            width,
            labels: vec![None; rng.len()],
            count: 0,
        };

        let mut stack = Vec::new();
        for start in rng {
            let Some(si) = grid.idx(start) else {
                continue;
            };
            if grid.labels[si].is_some() || !walk.is_walkable(start) {
                continue;
            }

            // Iterative DFS from `start`.
            let label = RegionId(grid.count as u32);
            grid.labels[si] = Some(label);
            stack.clear();
            stack.push(start);

            while let Some(cp) = stack.pop() {
                for np in cp.neighbors_4() {
                    let Some(ni) = grid.idx(np) else {
                        continue;
                    };
                    if grid.labels[ni].is_none() && walk.is_walkable(np) {
                        grid.labels[ni] = Some(label);
                        stack.push(np);
                    }
                }
            }

            grid.count += 1;
        }

        grid
    }

    /// Number of regions found.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The labelled map range.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    #[inline]
    fn idx(&self, p: TilePos) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Region of `p`, if it is a walkable tile inside the map.
    pub fn region_at(&self, p: TilePos) -> Option<RegionId> {
        self.labels[self.idx(p)?]
    }
}

impl RegionResolver for RegionGrid {
    #[inline]
    fn region_of(&self, p: TilePos) -> Option<RegionId> {
        self.region_at(p)
    }
}
