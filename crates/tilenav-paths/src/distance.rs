use tilenav_core::TilePos;

/// Manhattan (L1) distance between two tiles.
#[inline]
pub fn manhattan(a: TilePos, b: TilePos) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two tiles.
#[inline]
pub fn chebyshev(a: TilePos, b: TilePos) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Integer approximation of the Euclidean distance between two tiles.
///
/// Octagonal approximation using shifts only; it never exceeds the Manhattan
/// distance, so it is admissible for 4-way movement.
#[inline]
pub fn approx_distance(a: TilePos, b: TilePos) -> i32 {
    let mut min = (a.x - b.x).abs();
    let mut max = (a.y - b.y).abs();
    if max < min {
        std::mem::swap(&mut min, &mut max);
    }
    if min < (max >> 2) {
        return max;
    }
    let min_calc = (3 * min) >> 3;
    (min_calc >> 5) + min_calc + max - (max >> 4) - (max >> 6)
}
