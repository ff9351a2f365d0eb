use std::fmt;

use tilenav_core::TilePos;

/// Errors raised by path service construction and by search defects.
///
/// A query that simply finds no route is *not* an error: it yields a
/// [`Path`](crate::Path) with `is_reachable() == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path cache was configured with a capacity of zero.
    ZeroCapacity,
    /// The map range has no tiles.
    EmptyMap,
    /// Following parent links from the target did not reach the source.
    BrokenParentChain { at: TilePos, steps: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => f.write_str("path cache capacity must be non-zero"),
            Self::EmptyMap => f.write_str("map range is empty"),
            Self::BrokenParentChain { at, steps } => {
                write!(f, "parent chain broken at {at} after {steps} steps")
            }
        }
    }
}

impl std::error::Error for PathError {}
