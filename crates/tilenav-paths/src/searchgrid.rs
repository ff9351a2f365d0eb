use std::collections::VecDeque;

use tilenav_core::{Range, TilePos};

/// Marker for "no parent" in the flat parent array.
pub(crate) const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Heuristic-search frontier
// ---------------------------------------------------------------------------

/// A node of the heuristic search, stored in an arena owned by the search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeuristicNode {
    pub(crate) tile: TilePos,
    pub(crate) cost: i32,
    /// Arena index of the node this one was reached from.
    pub(crate) from: usize,
}

/// Frontier entry, ordered by `priority` then by insertion `seq`.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct FrontierRef {
    pub(crate) node: usize,
    pub(crate) priority: i32,
    pub(crate) seq: u64,
}

impl Ord for FrontierRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest priority first,
        // and among equal priorities the earliest inserted.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// SearchGrid
// ---------------------------------------------------------------------------

/// Owner of the per-tile scratch state used by both search engines.
///
/// The arrays are sized to the map once; each search bumps a generation
/// counter instead of clearing them, so repeated queries do not reallocate.
pub struct SearchGrid {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    /// Generation in which each tile was last visited.
    pub(crate) visited: Vec<u32>,
    pub(crate) generation: u32,
    /// Flood search: flat index of each visited tile's parent.
    pub(crate) parents: Vec<usize>,
    pub(crate) queue: VecDeque<usize>,
    /// Heuristic search: node arena.
    pub(crate) nodes: Vec<HeuristicNode>,
}

impl SearchGrid {
    /// Create a new `SearchGrid` covering the given map range.
    pub fn new(rng: Range) -> Self {
        let w = rng.width().max(0) as usize;
        let len = rng.len();
        Self {
            rng,
            width: w,
            visited: vec![0; len],
            generation: 0,
            parents: vec![NO_PARENT; len],
            queue: VecDeque::new(),
            nodes: Vec::new(),
        }
    }

    /// The map range being searched.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Start a new search: every tile becomes unvisited.
    pub(crate) fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stale stamps could alias the new generation.
            self.visited.fill(0);
            self.generation = 1;
        }
        self.generation
    }

    /// Whether the tile at `i` was visited in the current search.
    #[inline]
    pub(crate) fn is_visited(&self, i: usize) -> bool {
        self.visited[i] == self.generation
    }

    #[inline]
    pub(crate) fn mark_visited(&mut self, i: usize) {
        self.visited[i] = self.generation;
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `TilePos` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: TilePos) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        let x = (p.x - self.rng.min.x) as usize;
        let y = (p.y - self.rng.min.y) as usize;
        Some(y * self.width + x)
    }

    /// Convert a flat index back to a `TilePos`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> TilePos {
        let x = (idx % self.width) as i32 + self.rng.min.x;
        let y = (idx / self.width) as i32 + self.rng.min.y;
        TilePos::new(x, y)
    }
}
