use tilenav_core::TilePos;

use crate::traits::Walkable;

/// Step order of the flood search: down, right, left, up.
///
/// Fixed so that tie-breaking between equal-length routes is deterministic.
pub const FLOOD_DIRS: [TilePos; 4] = [
    TilePos::new(0, 1),
    TilePos::new(1, 0),
    TilePos::new(-1, 0),
    TilePos::new(0, -1),
];

/// Step order of the heuristic search: left, right, up, down.
pub const HEURISTIC_DIRS: [TilePos; 4] = [
    TilePos::new(-1, 0),
    TilePos::new(1, 0),
    TilePos::new(0, -1),
    TilePos::new(0, 1),
];

/// Whether the step `dir` out of `from` would cut a blocked corner.
///
/// A diagonal step is rejected when either of its two orthogonal components
/// is not walkable. Orthogonal steps never cut a corner.
#[inline]
pub fn cuts_corner<W: Walkable>(walk: &W, from: TilePos, dir: TilePos) -> bool {
    if dir.x == 0 || dir.y == 0 {
        return false;
    }
    !walk.is_walkable(from.shift(dir.x, 0)) || !walk.is_walkable(from.shift(0, dir.y))
}
